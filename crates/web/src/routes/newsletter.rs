//! Newsletter subscription and broadcast handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cornerstone_core::Email;

use crate::db::SubscriberRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::Subscriber;
use crate::services::{BroadcastReport, NewsletterMessage, broadcast};
use crate::state::AppState;

/// Subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// Response for a subscription.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
}

/// Subscribe an address. Subscribing twice is not an error.
///
/// POST /api/newsletter/subscribe
#[instrument(skip_all, fields(email = %req.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, AppError> {
    let email = Email::parse(&req.email)
        .map_err(|_| AppError::BadRequest("Please enter a valid email address.".to_string()))?;

    let pool = state.db().pool().await?;
    let subscriber = SubscriberRepository::new(pool).subscribe(&email).await?;

    tracing::info!(id = %subscriber.id, "Newsletter subscription recorded");
    Ok(Json(SubscribeResponse { success: true }))
}

/// GET /api/newsletter/subscribers
pub async fn subscribers(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Subscriber>>, AppError> {
    let pool = state.db().pool().await?;
    let subscribers = SubscriberRepository::new(pool).list_all().await?;
    Ok(Json(subscribers))
}

/// Send a newsletter to every subscriber.
///
/// POST /api/newsletter/send
///
/// Responds 503 when SMTP is not configured.
#[instrument(skip_all, fields(by = %admin.claims().email, subject = %message.subject))]
pub async fn send(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Json(message): Json<NewsletterMessage>,
) -> Result<Json<BroadcastReport>, AppError> {
    message.validate().map_err(AppError::BadRequest)?;

    let Some(mailer) = state.email() else {
        tracing::warn!("Newsletter send requested but SMTP is not configured");
        return Err(AppError::ServiceUnavailable(
            "email delivery is not configured".to_string(),
        ));
    };

    let pool = state.db().pool().await?;
    let recipients: Vec<Email> = SubscriberRepository::new(pool)
        .list_all()
        .await?
        .into_iter()
        .map(|subscriber| subscriber.email)
        .collect();

    let report = broadcast(mailer, &recipients, &message).await;
    Ok(Json(report))
}
