//! Admin dashboard pages.
//!
//! Everything here sits behind the admin gate.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use cornerstone_core::ContentKind;

use crate::db::{ContentRepository, PageRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::PageVisibility;
use crate::state::AppState;

/// Item count for one content kind.
pub struct KindCount {
    pub kind: &'static str,
    pub label: &'static str,
    pub count: i64,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub pages: Vec<PageVisibility>,
    pub counts: Vec<KindCount>,
    pub email_enabled: bool,
}

/// Every kind in display order, zero when absent from `counts`.
fn counts_for_all_kinds(counts: &[(ContentKind, i64)]) -> Vec<KindCount> {
    ContentKind::ALL
        .iter()
        .map(|&kind| KindCount {
            kind: kind.as_str(),
            label: kind.label(),
            count: counts
                .iter()
                .find(|(k, _)| *k == kind)
                .map_or(0, |(_, n)| *n),
        })
        .collect()
}

/// GET /admin
pub async fn dashboard(
    admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.db().pool().await?;
    let pages = PageRepository::new(pool).list_all().await?;
    let counts = ContentRepository::new(pool).count_by_kind().await?;

    Ok(DashboardTemplate {
        email: admin.into_claims().email,
        pages,
        counts: counts_for_all_kinds(&counts),
        email_enabled: state.email().is_some(),
    })
}

/// Any other path under `/admin`.
pub async fn not_found() -> AppError {
    AppError::NotFound("admin page".to_string())
}
