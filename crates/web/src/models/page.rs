//! Page visibility flags.

use serde::Serialize;

/// Whether a logical page of the public site is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVisibility {
    /// URL slug of the page (e.g. `careers`).
    pub slug: String,
    /// Display name used in the admin menu.
    pub name: String,
    /// Hidden pages answer 404 on the public site.
    pub visible: bool,
}
