//! HTTP middleware and extractors.
//!
//! - `cookie` - Reading and writing the `token` session cookie
//! - `gate` - Redirect gate in front of the `/admin` pages
//! - `auth` - `RequireRole` extractor for API handlers

pub mod auth;
pub mod cookie;
pub mod gate;

pub use auth::{AdminRole, AnyRole, AuthRejection, RequireAdmin, RequireRole, RoleRequirement};
pub use cookie::{SESSION_COOKIE, clear_session_cookie, session_cookie, token_from_headers};
pub use gate::{LOGIN_PATH, admin_gate};
