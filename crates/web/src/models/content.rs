//! Editable content items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cornerstone_core::{ContentItemId, ContentKind};

/// One piece of site content (a service, a project, a blog post, ...).
///
/// Kind-specific fields live in `body`, which the dashboard form for each
/// kind reads and writes as a whole.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    pub id: ContentItemId,
    pub kind: ContentKind,
    pub title: String,
    pub slug: String,
    pub body: serde_json::Value,
    pub published: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a content item.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDraft {
    pub title: String,
    pub slug: String,
    #[serde(default = "empty_body")]
    pub body: serde_json::Value,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn empty_body() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl ContentDraft {
    /// Check the draft before it reaches the database.
    ///
    /// Returns a message suitable for a 400 response.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if !is_valid_slug(&self.slug) {
            return Err("slug must be lowercase letters, digits and dashes".to_string());
        }
        if !self.body.is_object() {
            return Err("body must be a JSON object".to_string());
        }
        Ok(())
    }
}

/// Lowercase ASCII letters, digits and single inner dashes.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(title: &str, slug: &str) -> ContentDraft {
        ContentDraft {
            title: title.to_string(),
            slug: slug.to_string(),
            body: empty_body(),
            published: false,
            sort_order: 0,
        }
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("commercial-renovation"));
        assert!(is_valid_slug("project-2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--dash"));
        assert!(!is_valid_slug("Upper"));
        assert!(!is_valid_slug("with space"));
    }

    #[test]
    fn test_validate_requires_title() {
        assert_eq!(
            draft("   ", "roofing").validate().unwrap_err(),
            "title is required"
        );
        assert!(draft("Roofing", "roofing").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_object_body() {
        let mut d = draft("Roofing", "roofing");
        d.body = serde_json::json!(["not", "an", "object"]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_draft_defaults() {
        let d: ContentDraft =
            serde_json::from_str(r#"{"title":"Steel framing","slug":"steel-framing"}"#).unwrap();
        assert!(!d.published);
        assert_eq!(d.sort_order, 0);
        assert!(d.body.is_object());
    }
}
