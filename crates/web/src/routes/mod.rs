//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page
//! GET  /{slug}                        - Public page (404 when hidden)
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Readiness (database)
//!
//! # Auth
//! GET  /login                         - Login page
//! POST /login                         - Login form
//! POST /logout                        - Logout button
//! POST /api/auth/login                - JSON login, sets the token cookie
//! POST /api/auth/logout               - Clears the token cookie
//! GET  /api/auth/me                   - Claims of the current session
//!
//! # Admin pages (behind the admin gate)
//! GET  /admin                         - Dashboard
//!
//! # API (admin marks RequireAdmin)
//! GET    /api/users                   - admin
//! POST   /api/users                   - admin
//! PUT    /api/users/{id}              - admin
//! DELETE /api/users/{id}              - admin
//! GET    /api/pages
//! PUT    /api/pages/{slug}            - admin
//! GET    /api/content/{kind}          - ?all=true is admin
//! POST   /api/content/{kind}          - admin
//! GET    /api/content/{kind}/{id}
//! PUT    /api/content/{kind}/{id}     - admin
//! DELETE /api/content/{kind}/{id}     - admin
//! POST   /api/contact
//! GET    /api/contact                 - admin
//! DELETE /api/contact/{id}            - admin
//! POST   /api/newsletter/subscribe
//! GET    /api/newsletter/subscribers  - admin
//! POST   /api/newsletter/send         - admin
//! ```

pub mod admin;
pub mod auth;
pub mod contact;
pub mod content;
pub mod health;
pub mod newsletter;
pub mod pages;
pub mod public;
pub mod users;

use axum::{
    Router, middleware,
    routing::{any, delete, get, post, put},
};
use tower_http::normalize_path::NormalizePath;

use crate::middleware::admin_gate;
use crate::state::AppState;

/// Create the `/admin` page routes, wrapped in the admin gate.
///
/// The catch-all keeps unknown admin paths behind the gate too.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/{*rest}", any(admin::not_found))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_gate))
}

/// Create the JSON API router, to be nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", put(users::update).delete(users::delete))
        .route("/pages", get(pages::list))
        .route("/pages/{slug}", put(pages::set_visibility))
        .route("/content/{kind}", get(content::list).post(content::create))
        .route(
            "/content/{kind}/{id}",
            get(content::get)
                .put(content::update)
                .delete(content::delete),
        )
        .route("/contact", get(contact::list).post(contact::submit))
        .route("/contact/{id}", delete(contact::delete))
        .route("/newsletter/subscribe", post(newsletter::subscribe))
        .route("/newsletter/subscribers", get(newsletter::subscribers))
        .route("/newsletter/send", post(newsletter::send))
}

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(public::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/login", get(auth::login_page).post(auth::login_form))
        .route("/logout", post(auth::logout_form))
        .route("/{slug}", get(public::page))
        .merge(admin_routes(&state))
        .nest("/api", api_routes())
        .with_state(state)
}

/// Wrap a finished router so `/admin/` routes exactly like `/admin`.
///
/// Trailing slashes have to be trimmed before routing happens, so this wraps
/// the router as a service instead of going through `Router::layer`.
pub fn with_trimmed_slashes(router: Router) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(router)
}
