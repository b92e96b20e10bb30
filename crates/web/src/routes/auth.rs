//! Login, logout and session introspection.
//!
//! Both the JSON API and the HTML login form end the same way: the user's
//! credentials are checked, a token is issued, and it is stored in the
//! `token` cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::{AnyRole, LOGIN_PATH, RequireRole, clear_session_cookie, session_cookie};
use crate::models::User;
use crate::services::{AuthError, AuthService, Claims};
use crate::state::AppState;

/// Credentials submitted by the API or the login form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful API login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}

/// Check credentials and return the user with a `Set-Cookie` value.
async fn authenticate(state: &AppState, form: &LoginRequest) -> Result<(User, String), AppError> {
    let pool = state.db().pool().await?;
    let user = AuthService::new(pool)
        .login(&form.email, &form.password)
        .await?;

    let token = state.tokens().issue_for(&user).map_err(AuthError::from)?;
    let cookie = session_cookie(token, state.config().is_secure());

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok((user, cookie.to_string()))
}

/// Log in.
///
/// POST /api/auth/login
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let (user, cookie) = authenticate(&state, &form).await?;

    Ok(([(header::SET_COOKIE, cookie)], Json(LoginResponse { user })).into_response())
}

/// Log out by expiring the cookie.
///
/// POST /api/auth/logout
///
/// Tokens are not tracked server-side, so a copy of the token kept
/// elsewhere stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = clear_session_cookie(state.config().is_secure());
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cookie.to_string())],
    )
        .into_response()
}

/// Return the claims of the current session.
///
/// GET /api/auth/me
pub async fn me(session: RequireRole<AnyRole>) -> Json<Claims> {
    Json(session.into_claims())
}

/// Display the login page.
///
/// GET /login
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    let error = match query.error.as_deref() {
        Some("invalid") => Some("Invalid email or password."),
        Some(_) => Some("Something went wrong. Please try again."),
        None => None,
    };
    LoginTemplate { error }
}

/// Handle the login form.
///
/// POST /login
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login_form(State(state): State<AppState>, Form(form): Form<LoginRequest>) -> Response {
    match authenticate(&state, &form).await {
        Ok((_user, cookie)) => ([(header::SET_COOKIE, cookie)], Redirect::to("/admin")).into_response(),
        Err(AppError::Unauthorized(_)) => {
            Redirect::to(&format!("{LOGIN_PATH}?error=invalid")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            Redirect::to(&format!("{LOGIN_PATH}?error=unavailable")).into_response()
        }
    }
}

/// Handle the logout button.
///
/// POST /logout
pub async fn logout_form(State(state): State<AppState>) -> Response {
    let cookie = clear_session_cookie(state.config().is_secure());
    ([(header::SET_COOKIE, cookie.to_string())], Redirect::to(LOGIN_PATH)).into_response()
}
