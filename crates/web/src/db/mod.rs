//! Database access for the site.
//!
//! # Tables
//!
//! - `users` - Dashboard accounts (argon2 password hashes, roles)
//! - `page_visibility` - Per-page visibility flags
//! - `content_item` - Every editable content kind (JSONB body)
//! - `contact_submission` - Contact form messages
//! - `newsletter_subscriber` - Newsletter addresses
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p cornerstone-cli -- migrate
//! ```

pub mod contact;
pub mod content;
pub mod pages;
pub mod subscribers;
pub mod users;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::sync::OnceCell;

pub use contact::ContactRepository;
pub use content::ContentRepository;
pub use pages::PageRepository;
pub use subscribers::SubscriberRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Process-wide database handle with at-most-once connection setup.
///
/// Handlers call [`Database::pool`] on every request. The first caller
/// creates the pool; concurrent callers during a cold start wait on that
/// same initialization instead of racing their own. A failed attempt leaves
/// the cell empty so the next request retries.
pub struct Database {
    url: SecretString,
    pool: OnceCell<PgPool>,
}

impl Database {
    /// Create an unconnected handle. No I/O happens until first use.
    #[must_use]
    pub fn new(url: SecretString) -> Self {
        Self {
            url,
            pool: OnceCell::new(),
        }
    }

    /// Wrap an already-connected pool.
    #[must_use]
    pub fn from_pool(url: SecretString, pool: PgPool) -> Self {
        Self {
            url,
            pool: OnceCell::new_with(Some(pool)),
        }
    }

    /// Connect if no pool exists yet. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the connection fails.
    pub async fn ensure_connected(&self) -> Result<(), RepositoryError> {
        self.pool().await.map(|_| ())
    }

    /// Get the shared pool, connecting on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the connection fails.
    pub async fn pool(&self) -> Result<&PgPool, RepositoryError> {
        self.pool
            .get_or_try_init(|| async {
                tracing::info!("Connecting to database");
                create_pool(&self.url).await
            })
            .await
            .map_err(RepositoryError::from)
    }

    /// Whether a pool has been created.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }
}
