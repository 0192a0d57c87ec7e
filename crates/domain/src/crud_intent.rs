//! Classification of catalog permissions into CRUD-intent buckets.
//!
//! Every permission is a `(URL pattern, HTTP method)` pair. The administration
//! screens present them per entity as five toggleable intents; the mapping
//! from pair to intent lives here so the reconciler and the display layer
//! agree on it.

use std::str::FromStr;

use clavis_core::AppError;
use serde::{Deserialize, Serialize};

use crate::catalog::HttpMethod;

/// One of the five CRUD-intent buckets an entity row exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrudIntent {
    /// Read a single resource (GET with an id placeholder).
    View,
    /// Read the collection (GET without a placeholder).
    List,
    /// Create a resource (POST).
    Create,
    /// Update a resource (PUT or PATCH).
    Update,
    /// Delete a resource (DELETE).
    Delete,
}

impl CrudIntent {
    /// Returns a stable storage value for this intent.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns all intents in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[CrudIntent] = &[
            CrudIntent::View,
            CrudIntent::List,
            CrudIntent::Create,
            CrudIntent::Update,
            CrudIntent::Delete,
        ];

        ALL
    }
}

impl FromStr for CrudIntent {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Self::View),
            "list" => Ok(Self::List),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown crud intent '{value}' (expected one of view, list, create, update, delete)"
            ))),
        }
    }
}

/// Maps a `(method, URL pattern)` pair to its CRUD-intent bucket.
///
/// Write verbs classify regardless of URL shape; GET disambiguates between
/// `view` and `list` via the single-resource marker. Unknown verbs are
/// unclassified and return `None`; such permissions stay visible in the row
/// but never contribute to a flag.
#[must_use]
pub fn classify(method: &HttpMethod, url: &str) -> Option<CrudIntent> {
    match method {
        HttpMethod::Post => Some(CrudIntent::Create),
        HttpMethod::Put | HttpMethod::Patch => Some(CrudIntent::Update),
        HttpMethod::Delete => Some(CrudIntent::Delete),
        HttpMethod::Get => {
            if has_single_resource_marker(url) {
                Some(CrudIntent::View)
            } else {
                Some(CrudIntent::List)
            }
        }
        HttpMethod::Other(_) => None,
    }
}

/// Returns whether the final path segment of a URL pattern is a parameter
/// placeholder (`?`, `*`, `{…}`-wrapped, or `:`-prefixed).
///
/// Catalog entries are route patterns, not request URLs, so a bare `?` is a
/// placeholder segment rather than the start of a query string.
#[must_use]
pub fn has_single_resource_marker(url: &str) -> bool {
    let Some(last_segment) = url.trim().rsplit('/').find(|segment| !segment.is_empty()) else {
        return false;
    };

    last_segment == "?"
        || last_segment == "*"
        || last_segment.starts_with(':')
        || (last_segment.starts_with('{') && last_segment.ends_with('}'))
}
