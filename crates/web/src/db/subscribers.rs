//! Newsletter subscriber repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cornerstone_core::{Email, SubscriberId};

use super::RepositoryError;
use crate::models::Subscriber;

#[derive(Debug, sqlx::FromRow)]
struct SubscriberRow {
    id: i32,
    email: String,
    subscribed_at: DateTime<Utc>,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = RepositoryError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: SubscriberId::new(row.id),
            email,
            subscribed_at: row.subscribed_at,
        })
    }
}

/// Repository for newsletter subscribers.
pub struct SubscriberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriberRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add an address. Subscribing twice returns the existing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn subscribe(&self, email: &Email) -> Result<Subscriber, RepositoryError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row: SubscriberRow = sqlx::query_as(
            "INSERT INTO newsletter_subscriber (email) VALUES ($1) \
             ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email \
             RETURNING id, email, subscribed_at",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// All subscribers, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        let rows: Vec<SubscriberRow> = sqlx::query_as(
            "SELECT id, email, subscribed_at FROM newsletter_subscriber ORDER BY subscribed_at",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
