//! User management API (admin only).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use cornerstone_core::{Role, UserId};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// New user data.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// Replacement profile data. An absent or empty password keeps the old one.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub password: Option<String>,
}

/// GET /api/users
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let pool = state.db().pool().await?;
    let users = UserRepository::new(pool).list_all().await?;
    Ok(Json(users))
}

/// POST /api/users
#[instrument(skip_all, fields(by = %admin.claims().email, email = %req.email))]
pub async fn create(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let pool = state.db().pool().await?;
    let user = AuthService::new(pool)
        .create_user(&req.email, &req.name, req.role, &req.password)
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{id}
#[instrument(skip_all, fields(by = %admin.claims().email, user_id = id))]
pub async fn update(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let pool = state.db().pool().await?;
    let user = AuthService::new(pool)
        .update_user(
            UserId::new(id),
            &req.email,
            &req.name,
            req.role,
            req.password.as_deref(),
        )
        .await?;

    tracing::info!(user_id = %user.id, "User updated");
    Ok(Json(user))
}

/// DELETE /api/users/{id}
///
/// Admins cannot delete their own account.
#[instrument(skip_all, fields(by = %admin.claims().email, user_id = id))]
pub async fn delete(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if admin.claims().user_id == id.to_string() {
        return Err(AppError::BadRequest(
            "you cannot delete your own account".to_string(),
        ));
    }

    let pool = state.db().pool().await?;
    UserRepository::new(pool).delete(UserId::new(id)).await?;

    tracing::info!("User deleted");
    Ok(StatusCode::NO_CONTENT)
}
