//! Kinds of editable site content.
//!
//! Every kind is stored in the same table and served by the same CRUD
//! routes; the kind is the first path segment under `/api/content`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a path segment does not name a [`ContentKind`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown content kind: {0}")]
pub struct UnknownContentKind(pub String);

/// A kind of content the admin dashboard can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "content_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Services,
    Projects,
    Blog,
    Careers,
    Testimonials,
    Galleries,
    Team,
    Partners,
    Faqs,
    Certifications,
}

impl ContentKind {
    /// All kinds, in dashboard display order.
    pub const ALL: [Self; 10] = [
        Self::Services,
        Self::Projects,
        Self::Blog,
        Self::Careers,
        Self::Testimonials,
        Self::Galleries,
        Self::Team,
        Self::Partners,
        Self::Faqs,
        Self::Certifications,
    ];

    /// URL path segment for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Projects => "projects",
            Self::Blog => "blog",
            Self::Careers => "careers",
            Self::Testimonials => "testimonials",
            Self::Galleries => "galleries",
            Self::Team => "team",
            Self::Partners => "partners",
            Self::Faqs => "faqs",
            Self::Certifications => "certifications",
        }
    }

    /// Human-readable label for dashboard headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Services => "Services",
            Self::Projects => "Projects",
            Self::Blog => "Blog posts",
            Self::Careers => "Careers",
            Self::Testimonials => "Testimonials",
            Self::Galleries => "Galleries",
            Self::Team => "Team members",
            Self::Partners => "Partners",
            Self::Faqs => "FAQs",
            Self::Certifications => "Certifications",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = UnknownContentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownContentKind(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_parses_from_its_path_segment() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.as_str().parse::<ContentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        assert!("invoices".parse::<ContentKind>().is_err());
        assert!("".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_serde_matches_path_segment() {
        for kind in ContentKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
