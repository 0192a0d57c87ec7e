//! Permission catalog domain types.

use clavis_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Unique identifier for a permission record, assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Creates a permission identifier from a backend-assigned value.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PermissionId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// HTTP method attached to a catalog permission.
///
/// Parsing is total: verbs outside the five the catalog is expected to carry
/// land in [`HttpMethod::Other`] so a foreign catalog entry degrades to an
/// unclassified permission instead of failing a whole load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
    /// Any other verb, kept verbatim (upper-cased) for display.
    Other(String),
}

impl HttpMethod {
    /// Parses a method string case-insensitively. Never fails.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the canonical upper-case verb.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Other(verb) => verb.as_str(),
        }
    }
}

impl From<String> for HttpMethod {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<HttpMethod> for String {
    fn from(value: HttpMethod) -> Self {
        value.as_str().to_owned()
    }
}

/// One addressable backend operation in the permission catalog.
///
/// The backend keeps `(url, method)` pairs unique within the catalog; the
/// console surfaces the resulting conflict when an administrator tries to
/// register a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    id: PermissionId,
    url: NonEmptyString,
    method: HttpMethod,
}

impl PermissionDefinition {
    /// Creates a permission definition with a validated URL pattern.
    pub fn new(id: PermissionId, url: impl Into<String>, method: HttpMethod) -> AppResult<Self> {
        Ok(Self {
            id,
            url: validate_url_pattern(url)?,
            method,
        })
    }

    /// Returns the stable permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the URL pattern.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &HttpMethod {
        &self.method
    }
}

/// Validates a catalog URL pattern: non-empty and rooted at `/`.
pub fn validate_url_pattern(url: impl Into<String>) -> AppResult<NonEmptyString> {
    let url = NonEmptyString::new(url)?;
    if !url.as_str().starts_with('/') {
        return Err(clavis_core::AppError::Validation(format!(
            "url pattern '{}' must start with '/'",
            url.as_str()
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::{HttpMethod, PermissionDefinition, PermissionId, validate_url_pattern};

    #[test]
    fn method_parsing_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("get"), HttpMethod::Get);
        assert_eq!(HttpMethod::parse(" Post "), HttpMethod::Post);
        assert_eq!(HttpMethod::parse("DELETE"), HttpMethod::Delete);
    }

    #[test]
    fn unknown_method_is_preserved_as_other() {
        let method = HttpMethod::parse("options");
        assert_eq!(method, HttpMethod::Other("OPTIONS".to_owned()));
        assert_eq!(method.as_str(), "OPTIONS");
    }

    #[test]
    fn url_pattern_must_be_rooted() {
        assert!(validate_url_pattern("users").is_err());
        assert!(validate_url_pattern("  ").is_err());
        assert!(validate_url_pattern("/users").is_ok());
    }

    #[test]
    fn permission_definition_rejects_relative_url() {
        let result = PermissionDefinition::new(PermissionId::from_i64(1), "users", HttpMethod::Get);
        assert!(result.is_err());
    }
}
