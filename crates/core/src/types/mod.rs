//! Core types for Cornerstone.

pub mod content_kind;
pub mod email;
pub mod id;
pub mod role;

pub use content_kind::{ContentKind, UnknownContentKind};
pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, UnknownRole};
