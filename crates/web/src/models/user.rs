//! User account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cornerstone_core::{Email, Role, UserId};

/// A dashboard user account.
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
