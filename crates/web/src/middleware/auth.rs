//! Authorization extractor for API handlers.
//!
//! `RequireRole<R>` verifies the session token and role claim while the
//! request is being extracted, so a rejected request never reaches the
//! handler body (and never touches the database).

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use cornerstone_core::Role;

use super::cookie::token_from_headers;
use crate::services::auth::{Claims, TokenError, TokenService};

/// A rule about which verified claims may pass.
pub trait RoleRequirement: Send + Sync + 'static {
    /// Whether `claims` satisfy this requirement.
    fn allows(claims: &Claims) -> bool;
}

/// Only tokens whose role claim is `admin`.
#[derive(Debug, Clone, Copy)]
pub struct AdminRole;

impl RoleRequirement for AdminRole {
    fn allows(claims: &Claims) -> bool {
        claims.has_role(Role::Admin)
    }
}

/// Any valid token, whatever its role.
#[derive(Debug, Clone, Copy)]
pub struct AnyRole;

impl RoleRequirement for AnyRole {
    fn allows(_claims: &Claims) -> bool {
        true
    }
}

/// Extractor that requires a valid session token satisfying `R`.
///
/// # Example
///
/// ```rust,ignore
/// async fn delete_user(
///     admin: RequireAdmin,
///     Path(id): Path<i32>,
/// ) -> Result<StatusCode, AppError> {
///     tracing::info!(by = %admin.claims().email, "Deleting user");
///     // ...
/// }
/// ```
pub struct RequireRole<R: RoleRequirement> {
    claims: Claims,
    _requirement: PhantomData<fn() -> R>,
}

/// Shorthand for the admin requirement used by every mutating route.
pub type RequireAdmin = RequireRole<AdminRole>;

impl<R: RoleRequirement> RequireRole<R> {
    /// The verified claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Take the verified claims.
    #[must_use]
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

/// Why a request was refused authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `token` cookie was sent.
    MissingToken,
    /// The token failed verification.
    InvalidToken(TokenError),
    /// The token is valid but its role is not allowed.
    InsufficientRole,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingToken => {
                (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
            }
            Self::InvalidToken(_) | Self::InsufficientRole => {
                (StatusCode::FORBIDDEN, "Forbidden").into_response()
            }
        }
    }
}

impl<S, R> FromRequestParts<S> for RequireRole<R>
where
    S: Send + Sync,
    TokenService: FromRef<S>,
    R: RoleRequirement,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(AuthRejection::MissingToken)?;

        let claims = TokenService::from_ref(state)
            .verify(&token)
            .map_err(|reason| {
                tracing::debug!(path = %parts.uri.path(), %reason, "Rejected session token");
                AuthRejection::InvalidToken(reason)
            })?;

        if !R::allows(&claims) {
            tracing::debug!(
                path = %parts.uri.path(),
                user_id = %claims.user_id,
                role = %claims.role,
                "Role not permitted"
            );
            return Err(AuthRejection::InsufficientRole);
        }

        Ok(Self {
            claims,
            _requirement: PhantomData,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Request, header};

    use super::*;

    fn tokens() -> TokenService {
        TokenService::new(b"extractor-test-secret-extractor-test")
    }

    fn parts_with_cookie(cookie: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/users");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn extract<R: RoleRequirement>(
        cookie: Option<&str>,
    ) -> Result<RequireRole<R>, AuthRejection> {
        let mut parts = parts_with_cookie(cookie);
        RequireRole::<R>::from_request_parts(&mut parts, &tokens()).await
    }

    #[tokio::test]
    async fn test_missing_cookie_is_unauthorized() {
        let rejection = extract::<AdminRole>(None).await.err().unwrap();
        assert_eq!(rejection, AuthRejection::MissingToken);
        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_forbidden() {
        let rejection = extract::<AdminRole>(Some("token=garbage"))
            .await
            .err()
            .unwrap();
        assert_eq!(rejection, AuthRejection::InvalidToken(TokenError::Malformed));
        assert_eq!(rejection.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let token = tokens().issue("7", "editor@x.com", "editor").unwrap();
        let rejection = extract::<AdminRole>(Some(&format!("token={token}")))
            .await
            .err()
            .unwrap();
        assert_eq!(rejection, AuthRejection::InsufficientRole);
        assert_eq!(rejection.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let token = tokens().issue("1", "a@x.com", "admin").unwrap();
        let admin = extract::<AdminRole>(Some(&format!("token={token}")))
            .await
            .unwrap();
        assert_eq!(admin.claims().user_id, "1");
        assert_eq!(admin.into_claims().email, "a@x.com");
    }

    #[tokio::test]
    async fn test_any_role_accepts_viewer() {
        let token = tokens().issue("9", "v@x.com", "viewer").unwrap();
        let user = extract::<AnyRole>(Some(&format!("token={token}")))
            .await
            .unwrap();
        assert_eq!(user.claims().role, "viewer");
    }
}
