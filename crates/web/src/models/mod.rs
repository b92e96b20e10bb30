//! Domain models.
//!
//! These types are what route handlers and services work with; the row
//! types in [`crate::db`] are converted into them at the repository edge.

pub mod contact;
pub mod content;
pub mod page;
pub mod subscriber;
pub mod user;

pub use contact::{ContactSubmission, NewContactSubmission};
pub use content::{ContentDraft, ContentItem};
pub use page::PageVisibility;
pub use subscriber::Subscriber;
pub use user::User;
