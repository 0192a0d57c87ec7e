//! Grant-set read model: the permission catalog grouped per entity and
//! annotated with one role's current grants.
//!
//! This is the shape the grant store returns for a role. It is derived data,
//! never persisted locally; a fresh fetch is the only way to resynchronize
//! with changes made by other sessions.

use clavis_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::catalog::PermissionDefinition;
use crate::crud_intent::{self, CrudIntent};

/// One catalog permission annotated with whether the inspected role holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedPermission {
    permission: PermissionDefinition,
    granted: bool,
}

impl GrantedPermission {
    /// Creates an annotated permission.
    #[must_use]
    pub fn new(permission: PermissionDefinition, granted: bool) -> Self {
        Self {
            permission,
            granted,
        }
    }

    /// Returns the underlying catalog permission.
    #[must_use]
    pub fn permission(&self) -> &PermissionDefinition {
        &self.permission
    }

    /// Returns whether the inspected role currently holds this permission.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Overwrites the local grant annotation.
    pub fn set_granted(&mut self, granted: bool) {
        self.granted = granted;
    }

    /// Returns the CRUD-intent bucket this permission classifies into, if any.
    #[must_use]
    pub fn intent(&self) -> Option<CrudIntent> {
        crud_intent::classify(self.permission.method(), self.permission.url())
    }
}

/// All catalog permissions of one entity (resource family), annotated for a
/// single role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    entity: NonEmptyString,
    permissions: Vec<GrantedPermission>,
}

impl PermissionGroup {
    /// Creates a group with a validated entity name.
    pub fn new(
        entity: impl Into<String>,
        permissions: Vec<GrantedPermission>,
    ) -> AppResult<Self> {
        Ok(Self {
            entity: NonEmptyString::new(entity)?,
            permissions,
        })
    }

    /// Returns the entity (resource family) name.
    #[must_use]
    pub fn entity(&self) -> &str {
        self.entity.as_str()
    }

    /// Returns the annotated permissions of this entity.
    #[must_use]
    pub fn permissions(&self) -> &[GrantedPermission] {
        &self.permissions
    }

    /// Returns the permissions for in-place annotation updates.
    ///
    /// Group membership is fixed after construction; only the per-permission
    /// grant annotations change.
    pub fn permissions_mut(&mut self) -> &mut [GrantedPermission] {
        &mut self.permissions
    }

    /// Returns whether the bucket flag for `intent` is on.
    ///
    /// A flag is on if at least one permission classified into the bucket is
    /// granted. Duplicate catalog variants serving the same intent therefore
    /// collapse into a single flag.
    #[must_use]
    pub fn is_bucket_granted(&self, intent: CrudIntent) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.intent() == Some(intent) && permission.is_granted())
    }

    /// Returns the permissions that classify into `intent`.
    #[must_use]
    pub fn permissions_in_bucket(&self, intent: CrudIntent) -> Vec<&GrantedPermission> {
        self.permissions
            .iter()
            .filter(|permission| permission.intent() == Some(intent))
            .collect()
    }

    /// Returns the permissions no bucket claims (unknown HTTP verbs).
    ///
    /// These stay visible in listings but never drive a flag.
    #[must_use]
    pub fn unclassified_permissions(&self) -> Vec<&GrantedPermission> {
        self.permissions
            .iter()
            .filter(|permission| permission.intent().is_none())
            .collect()
    }
}
