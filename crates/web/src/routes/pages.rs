//! Page visibility API.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::PageRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::PageVisibility;
use crate::state::AppState;

/// Body of a visibility toggle.
#[derive(Debug, Deserialize)]
pub struct SetVisibilityRequest {
    pub visible: bool,
}

/// GET /api/pages
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PageVisibility>>, AppError> {
    let pool = state.db().pool().await?;
    let pages = PageRepository::new(pool).list_all().await?;
    Ok(Json(pages))
}

/// PUT /api/pages/{slug}
#[instrument(skip_all, fields(by = %admin.claims().email, slug = %slug, visible = req.visible))]
pub async fn set_visibility(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<SetVisibilityRequest>,
) -> Result<Json<PageVisibility>, AppError> {
    let pool = state.db().pool().await?;
    let page = PageRepository::new(pool)
        .set_visible(&slug, req.visible)
        .await?;

    tracing::info!("Page visibility changed");
    Ok(Json(page))
}
