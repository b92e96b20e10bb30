//! Contact submission repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cornerstone_core::{ContactSubmissionId, Email};

use super::RepositoryError;
use crate::models::ContactSubmission;

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: i32,
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for ContactSubmission {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: ContactSubmissionId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Repository for contact form submissions.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        phone: Option<&str>,
        message: &str,
    ) -> Result<ContactSubmission, RepositoryError> {
        let row: ContactRow = sqlx::query_as(
            "INSERT INTO contact_submission (name, email, phone, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, phone, message, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// All submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<ContactSubmission>, RepositoryError> {
        let rows: Vec<ContactRow> = sqlx::query_as(
            "SELECT id, name, email, phone, message, created_at \
             FROM contact_submission ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Delete a submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it does not exist.
    pub async fn delete(&self, id: ContactSubmissionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM contact_submission WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
