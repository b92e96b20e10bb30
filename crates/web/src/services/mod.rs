//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password login and signed session tokens
//! - `email` - Email delivery via SMTP
//! - `newsletter` - Sequential newsletter broadcast

pub mod auth;
pub mod email;
pub mod newsletter;

pub use auth::{AuthError, AuthService, Claims, TokenError, TokenService};
pub use email::{EmailError, EmailService, Mailer};
pub use newsletter::{BroadcastReport, NewsletterMessage, broadcast};
