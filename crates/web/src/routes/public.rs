//! Public site pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use cornerstone_core::ContentKind;

use crate::db::{ContentRepository, PageRepository};
use crate::error::AppError;
use crate::models::{ContentItem, PageVisibility};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Vec<PageVisibility>,
}

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub nav: Vec<PageVisibility>,
    pub title: String,
    pub items: Vec<ContentItem>,
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let pool = state.db().pool().await?;
    let nav = visible_pages(PageRepository::new(pool).list_all().await?);
    Ok(HomeTemplate { nav })
}

/// GET /{slug}
///
/// A page whose flag is off is a 404. A slug without a flag passes the
/// visibility check, but is still a 404 unless it names a content kind.
pub async fn page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.db().pool().await?;
    let pages = PageRepository::new(pool);

    let flag = pages.get(&slug).await?;
    if flag.as_ref().is_some_and(|f| !f.visible) {
        tracing::debug!(slug = %slug, "Hidden page requested");
        return Err(AppError::NotFound(format!("page '{slug}'")));
    }

    let (title, items) = match (slug.parse::<ContentKind>().ok(), flag) {
        (Some(kind), _) => {
            let items = ContentRepository::new(pool).list(kind, false).await?;
            (kind.label().to_string(), items)
        }
        (None, Some(flag)) => (flag.name, Vec::new()),
        (None, None) => return Err(AppError::NotFound(format!("page '{slug}'"))),
    };

    let nav = visible_pages(pages.list_all().await?);
    Ok(PageTemplate { nav, title, items })
}

fn visible_pages(pages: Vec<PageVisibility>) -> Vec<PageVisibility> {
    pages.into_iter().filter(|p| p.visible).collect()
}
