//! Role domain types.

use clavis_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Unique identifier for a role record, assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(i64);

impl RoleId {
    /// Creates a role identifier from a backend-assigned value.
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

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A named authorization bucket permissions are granted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    id: RoleId,
    name: NonEmptyString,
    description: String,
}

impl RoleDefinition {
    /// Creates a role definition with a validated name.
    ///
    /// The description is free-form and may be empty.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description: description.into().trim().to_owned(),
        })
    }

    /// Returns the stable role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::{RoleDefinition, RoleId};

    #[test]
    fn role_requires_a_name() {
        assert!(RoleDefinition::new(RoleId::from_i64(1), "  ", "anything").is_err());
    }

    #[test]
    fn role_description_may_be_empty() {
        let role = RoleDefinition::new(RoleId::from_i64(1), "auditors", "");
        assert!(role.is_ok());
    }

    #[test]
    fn role_description_is_trimmed() {
        let role = RoleDefinition::new(RoleId::from_i64(2), "operators", "  day-to-day ops  ");
        assert_eq!(
            role.map(|role| role.description().to_owned())
                .unwrap_or_default(),
            "day-to-day ops"
        );
    }
}
