//! Contact form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cornerstone_core::{ContactSubmissionId, Email};

/// A stored contact form message.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub id: ContactSubmissionId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Contact form payload as posted by the public site.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}
