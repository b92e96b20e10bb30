//! Session token commands.
//!
//! Tokens are signed with `JWT_SECRET`, or the built-in development key
//! when it is unset, exactly as the web server does.

use cornerstone_web::config::DEFAULT_JWT_SECRET;
use cornerstone_web::services::{TokenError, TokenService};

/// Issue a token for the given claims.
///
/// # Errors
///
/// Returns an error if the token cannot be signed.
pub fn issue(user_id: &str, email: &str, role: &str) -> Result<String, TokenError> {
    dotenvy::dotenv().ok();

    let secret = std::env::var("JWT_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET is not set; signing with the development key");
            DEFAULT_JWT_SECRET.to_owned()
        });

    TokenService::new(secret.as_bytes()).issue(user_id, email, role)
}
