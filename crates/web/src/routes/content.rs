//! Generic CRUD for every content kind.
//!
//! One set of handlers serves services, projects, blog posts, careers,
//! testimonials, galleries, team members, partners, FAQs and
//! certifications. The kind is the first path segment after
//! `/api/content/`; an unknown kind is a 404.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use cornerstone_core::{ContentItemId, ContentKind};

use crate::db::ContentRepository;
use crate::error::AppError;
use crate::middleware::{AuthRejection, RequireAdmin};
use crate::models::{ContentDraft, ContentItem};
use crate::state::AppState;

/// Query parameters for listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Include unpublished items (admin only).
    #[serde(default)]
    pub all: bool,
}

fn parse_kind(kind: &str) -> Result<ContentKind, AppError> {
    kind.parse()
        .map_err(|_| AppError::NotFound(format!("content kind '{kind}'")))
}

/// GET /api/content/{kind}
///
/// Anyone may list published items. `?all=true` also returns drafts and
/// requires an admin session.
pub async fn list(
    session: Result<RequireAdmin, AuthRejection>,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    if query.all {
        session?;
    }
    let kind = parse_kind(&kind)?;

    let pool = state.db().pool().await?;
    let items = ContentRepository::new(pool).list(kind, query.all).await?;
    Ok(Json(items))
}

/// GET /api/content/{kind}/{id}
///
/// Unpublished items are only visible to admins.
pub async fn get(
    session: Result<RequireAdmin, AuthRejection>,
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
) -> Result<Json<ContentItem>, AppError> {
    let kind = parse_kind(&kind)?;

    let pool = state.db().pool().await?;
    let item = ContentRepository::new(pool)
        .get(kind, ContentItemId::new(id))
        .await?
        .filter(|item| item.published || session.is_ok())
        .ok_or_else(|| AppError::NotFound(format!("{kind} item {id}")))?;

    Ok(Json(item))
}

/// POST /api/content/{kind}
#[instrument(skip_all, fields(by = %admin.claims().email, kind = %kind, slug = %draft.slug))]
pub async fn create(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(draft): Json<ContentDraft>,
) -> Result<(StatusCode, Json<ContentItem>), AppError> {
    let kind = parse_kind(&kind)?;
    draft.validate().map_err(AppError::BadRequest)?;

    let pool = state.db().pool().await?;
    let item = ContentRepository::new(pool).create(kind, &draft).await?;

    tracing::info!(id = %item.id, "Content item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/content/{kind}/{id}
#[instrument(skip_all, fields(by = %admin.claims().email, kind = %kind, id = id))]
pub async fn update(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
    Json(draft): Json<ContentDraft>,
) -> Result<Json<ContentItem>, AppError> {
    let kind = parse_kind(&kind)?;
    draft.validate().map_err(AppError::BadRequest)?;

    let pool = state.db().pool().await?;
    let item = ContentRepository::new(pool)
        .update(kind, ContentItemId::new(id), &draft)
        .await?;

    tracing::info!("Content item updated");
    Ok(Json(item))
}

/// DELETE /api/content/{kind}/{id}
#[instrument(skip_all, fields(by = %admin.claims().email, kind = %kind, id = id))]
pub async fn delete(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
) -> Result<StatusCode, AppError> {
    let kind = parse_kind(&kind)?;

    let pool = state.db().pool().await?;
    ContentRepository::new(pool)
        .delete(kind, ContentItemId::new(id))
        .await?;

    tracing::info!("Content item deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("faqs").ok(), Some(ContentKind::Faqs));
        assert_eq!(parse_kind("certifications").ok(), Some(ContentKind::Certifications));
        assert!(matches!(parse_kind("widgets"), Err(AppError::NotFound(_))));
    }
}
