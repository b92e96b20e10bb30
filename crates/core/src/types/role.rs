//! User roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known [`Role`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Coarse-grained role attached to every user account.
///
/// Only [`Role::Admin`] may enter the dashboard or call mutating API routes.
/// The other roles exist so accounts can be parked without deleting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to the dashboard and every mutating route.
    Admin,
    /// Drafts content but cannot publish through the admin API.
    Editor,
    /// Signed-in account with no administrative access.
    Viewer,
}

impl Role {
    /// The wire name of the role, as carried in session token claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}
