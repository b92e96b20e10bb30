//! Page visibility repository.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::PageVisibility;

#[derive(Debug, sqlx::FromRow)]
struct PageRow {
    slug: String,
    name: String,
    visible: bool,
}

impl From<PageRow> for PageVisibility {
    fn from(row: PageRow) -> Self {
        Self {
            slug: row.slug,
            name: row.name,
            visible: row.visible,
        }
    }
}

/// Repository for page visibility flags.
pub struct PageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All flags, ordered by name for the admin menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<PageVisibility>, RepositoryError> {
        let rows: Vec<PageRow> =
            sqlx::query_as("SELECT slug, name, visible FROM page_visibility ORDER BY name")
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Look up a single flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, slug: &str) -> Result<Option<PageVisibility>, RepositoryError> {
        let row: Option<PageRow> =
            sqlx::query_as("SELECT slug, name, visible FROM page_visibility WHERE slug = $1")
                .bind(slug)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Set a page's visibility.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the page has no flag.
    pub async fn set_visible(
        &self,
        slug: &str,
        visible: bool,
    ) -> Result<PageVisibility, RepositoryError> {
        let row: Option<PageRow> = sqlx::query_as(
            "UPDATE page_visibility SET visible = $2 WHERE slug = $1 \
             RETURNING slug, name, visible",
        )
        .bind(slug)
        .bind(visible)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
