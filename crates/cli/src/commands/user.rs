//! Dashboard user management commands.
//!
//! # Usage
//!
//! ```bash
//! cornerstone-cli user create -e owner@example.com -n "Site Owner" -r admin --password 'long-passphrase'
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use sqlx::PgPool;
use thiserror::Error;

use cornerstone_core::Role;
use cornerstone_web::services::{AuthError, AuthService};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, editor, viewer")]
    InvalidRole(String),

    /// Validation or storage failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns an error if the role is unknown, the email or password is
/// invalid, the email is taken, or the database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<i32, UserError> {
    let role: Role = role
        .parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;

    let database_url = super::database_url().ok_or(UserError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating user: {} ({})", email, role);
    let user = AuthService::new(&pool)
        .create_user(email, name, role, password)
        .await?;

    tracing::info!("User created with ID: {}", user.id);
    Ok(user.id.as_i32())
}
