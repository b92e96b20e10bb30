//! Content item repository.
//!
//! One table backs every [`ContentKind`]; each query is scoped by kind so an
//! ID from one kind can never address an item of another.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cornerstone_core::{ContentItemId, ContentKind};

use super::{RepositoryError, conflict_on_unique};
use crate::models::{ContentDraft, ContentItem};

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: i32,
    kind: ContentKind,
    title: String,
    slug: String,
    body: serde_json::Value,
    published: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContentRow> for ContentItem {
    fn from(row: ContentRow) -> Self {
        Self {
            id: ContentItemId::new(row.id),
            kind: row.kind,
            title: row.title,
            slug: row.slug,
            body: row.body,
            published: row.published,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CONTENT_COLUMNS: &str =
    "id, kind, title, slug, body, published, sort_order, created_at, updated_at";

/// Repository for content items.
pub struct ContentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List items of a kind in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        kind: ContentKind,
        include_unpublished: bool,
    ) -> Result<Vec<ContentItem>, RepositoryError> {
        let rows: Vec<ContentRow> = sqlx::query_as(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_item \
             WHERE kind = $1 AND (published OR $2) \
             ORDER BY sort_order, created_at DESC"
        ))
        .bind(kind)
        .bind(include_unpublished)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one item of a kind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        kind: ContentKind,
        id: ContentItemId,
    ) -> Result<Option<ContentItem>, RepositoryError> {
        let row: Option<ContentRow> = sqlx::query_as(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_item WHERE kind = $1 AND id = $2"
        ))
        .bind(kind)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Count items per kind, for the dashboard.
    ///
    /// Kinds with no items are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_kind(&self) -> Result<Vec<(ContentKind, i64)>, RepositoryError> {
        let rows: Vec<(ContentKind, i64)> =
            sqlx::query_as("SELECT kind, COUNT(*) FROM content_item GROUP BY kind")
                .fetch_all(self.pool)
                .await?;
        Ok(rows)
    }

    /// Create an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken within the kind.
    pub async fn create(
        &self,
        kind: ContentKind,
        draft: &ContentDraft,
    ) -> Result<ContentItem, RepositoryError> {
        let row: ContentRow = sqlx::query_as(&format!(
            "INSERT INTO content_item (kind, title, slug, body, published, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(kind)
        .bind(draft.title.trim())
        .bind(&draft.slug)
        .bind(&draft.body)
        .bind(draft.published)
        .bind(draft.sort_order)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug"))?;

        Ok(row.into())
    }

    /// Replace an item's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist in this
    /// kind, or `RepositoryError::Conflict` if the slug is taken.
    pub async fn update(
        &self,
        kind: ContentKind,
        id: ContentItemId,
        draft: &ContentDraft,
    ) -> Result<ContentItem, RepositoryError> {
        let row: Option<ContentRow> = sqlx::query_as(&format!(
            "UPDATE content_item \
             SET title = $3, slug = $4, body = $5, published = $6, sort_order = $7, \
                 updated_at = NOW() \
             WHERE kind = $1 AND id = $2 RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(kind)
        .bind(id)
        .bind(draft.title.trim())
        .bind(&draft.slug)
        .bind(&draft.body)
        .bind(draft.published)
        .bind(draft.sort_order)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist in this kind.
    pub async fn delete(&self, kind: ContentKind, id: ContentItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM content_item WHERE kind = $1 AND id = $2")
            .bind(kind)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
