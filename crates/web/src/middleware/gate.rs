//! Access gate for the `/admin` pages.
//!
//! Every request is checked from scratch: the token is read from the
//! cookie, verified, and its role must be `admin`. Anything else is
//! redirected to the login page. Nothing is refreshed or extended.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use cornerstone_core::Role;

use super::cookie::token_from_headers;
use crate::services::auth::TokenService;

/// Where refused page requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// Middleware that lets only admin sessions through.
pub async fn admin_gate(
    State(tokens): State<TokenService>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = token_from_headers(request.headers()) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match tokens.verify(&token) {
        Ok(claims) if claims.has_role(Role::Admin) => next.run(request).await,
        Ok(claims) => {
            tracing::debug!(
                path = %request.uri().path(),
                user_id = %claims.user_id,
                role = %claims.role,
                "Non-admin session refused at admin gate"
            );
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(reason) => {
            tracing::debug!(path = %request.uri().path(), %reason, "Invalid session at admin gate");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
