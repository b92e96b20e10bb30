//! Contact form handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use cornerstone_core::{ContactSubmissionId, Email};

use crate::db::ContactRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::{ContactSubmission, NewContactSubmission};
use crate::state::AppState;

/// Longest accepted message, in characters.
const MAX_MESSAGE_LENGTH: usize = 5000;

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
}

/// A submission that passed validation.
#[derive(Debug, PartialEq, Eq)]
struct ValidSubmission<'a> {
    name: &'a str,
    email: Email,
    phone: Option<&'a str>,
    message: &'a str,
}

fn validate(form: &NewContactSubmission) -> Result<ValidSubmission<'_>, AppError> {
    let email = Email::parse(&form.email)
        .map_err(|_| AppError::BadRequest("Please enter a valid email address.".to_string()))?;

    let name = form.name.trim();
    let message = form.message.trim();
    if name.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest(
            "Name and message are required.".to_string(),
        ));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Message must be at most {MAX_MESSAGE_LENGTH} characters."
        )));
    }

    let phone = form.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

    Ok(ValidSubmission {
        name,
        email,
        phone,
        message,
    })
}

/// Submit the contact form.
///
/// POST /api/contact
#[instrument(skip_all, fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<NewContactSubmission>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    let valid = validate(&form)?;

    let pool = state.db().pool().await?;
    let submission = ContactRepository::new(pool)
        .create(valid.name, &valid.email, valid.phone, valid.message)
        .await?;

    tracing::info!(id = %submission.id, "Contact submission stored");
    Ok((StatusCode::CREATED, Json(ContactResponse { success: true })))
}

/// GET /api/contact
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactSubmission>>, AppError> {
    let pool = state.db().pool().await?;
    let submissions = ContactRepository::new(pool).list_all().await?;
    Ok(Json(submissions))
}

/// DELETE /api/contact/{id}
#[instrument(skip_all, fields(by = %admin.claims().email, id = id))]
pub async fn delete(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let pool = state.db().pool().await?;
    ContactRepository::new(pool)
        .delete(ContactSubmissionId::new(id))
        .await?;

    tracing::info!("Contact submission deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, phone: Option<&str>, message: &str) -> NewContactSubmission {
        NewContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(String::from),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let form = form(" Dana ", " Dana@Example.com ", Some("  "), " Need a quote ");
        let valid = validate(&form).unwrap();
        assert_eq!(valid.name, "Dana");
        assert_eq!(valid.email.as_str(), "dana@example.com");
        assert_eq!(valid.phone, None);
        assert_eq!(valid.message, "Need a quote");
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert!(validate(&form("", "a@b.com", None, "hi")).is_err());
        assert!(validate(&form("Dana", "a@b.com", None, "   ")).is_err());
        assert!(validate(&form("Dana", "not-an-email", None, "hi")).is_err());
    }

    #[test]
    fn test_validate_rejects_long_message() {
        let long = "x".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(validate(&form("Dana", "a@b.com", None, &long)).is_err());
        let limit = "x".repeat(MAX_MESSAGE_LENGTH);
        assert!(validate(&form("Dana", "a@b.com", Some("555-0100"), &limit)).is_ok());
    }
}
