//! Ports to the backend services the console administers.
//!
//! The backend is consumed as black-box REST collaborators: the permission
//! catalog and role service plus the role-permission grant store. User
//! administration rides on the same API surface. Adapters live in the
//! infrastructure crate; fakes implement these traits in service tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use clavis_core::AppResult;
use clavis_domain::{
    HttpMethod, PermissionDefinition, PermissionGroup, PermissionId, RoleDefinition, RoleId,
    UserAccount, UserId,
};

/// Input payload for creating a catalog permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// URL pattern, rooted at `/`.
    pub url: String,
    /// Addressed HTTP method.
    pub method: HttpMethod,
}

/// Input payload for replacing a catalog permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePermissionInput {
    /// URL pattern, rooted at `/`.
    pub url: String,
    /// Addressed HTTP method.
    pub method: HttpMethod,
}

/// Input payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Free-form description, may be empty.
    pub description: String,
}

/// Input payload for replacing a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Free-form description, may be empty.
    pub description: String,
}

/// Input payload for creating a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Unique login name.
    pub username: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Whether the account may sign in.
    pub enabled: bool,
}

/// Input payload for replacing a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// Unique login name.
    pub username: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Whether the account may sign in.
    pub enabled: bool,
}

/// Input payload for assigning a role to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignRoleInput {
    /// Role to assign.
    pub role_id: RoleId,
    /// Start of the validity window; backend clock when absent.
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window; open-ended when absent.
    pub valid_until: Option<DateTime<Utc>>,
}

/// Assignment projection mapping a user to a role with a validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Assigned user.
    pub user_id: UserId,
    /// Assigned role.
    pub role_id: RoleId,
    /// Role name at assignment-read time.
    pub role_name: String,
    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,
    /// End of the validity window; open-ended when absent.
    pub valid_until: Option<DateTime<Utc>>,
}

impl RoleAssignment {
    /// Returns whether the assignment is in effect at `at`.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && self.valid_until.is_none_or(|until| at < until)
    }
}

/// Port for the permission catalog service.
#[async_trait]
pub trait PermissionCatalog: Send + Sync {
    /// Lists every catalog permission.
    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>>;

    /// Looks up one permission by identifier.
    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<PermissionDefinition>>;

    /// Creates a permission and returns it with its assigned identifier.
    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition>;

    /// Replaces a permission's pattern and method.
    async fn update_permission(
        &self,
        id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<PermissionDefinition>;

    /// Deletes a permission from the catalog.
    async fn delete_permission(&self, id: PermissionId) -> AppResult<()>;
}

/// Port for the role service.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Lists every role.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Looks up one role by identifier.
    async fn find_role(&self, id: RoleId) -> AppResult<Option<RoleDefinition>>;

    /// Creates a role and returns it with its assigned identifier.
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition>;

    /// Replaces a role's name and description.
    async fn update_role(&self, id: RoleId, input: UpdateRoleInput) -> AppResult<RoleDefinition>;

    /// Deletes a role.
    async fn delete_role(&self, id: RoleId) -> AppResult<()>;
}

/// Port for the role-permission grant store.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Returns the full catalog grouped per entity, each permission annotated
    /// with whether `role_id` holds it. Unknown roles yield an empty listing.
    async fn grouped_for_role(&self, role_id: RoleId) -> AppResult<Vec<PermissionGroup>>;

    /// Creates the role-permission association.
    async fn grant(&self, role_id: RoleId, permission_id: PermissionId) -> AppResult<()>;

    /// Deletes the role-permission association. Revoking an absent grant
    /// succeeds, so repeated revokes are safe.
    async fn revoke(&self, role_id: RoleId, permission_id: PermissionId) -> AppResult<()>;
}

/// Port for user account administration.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Lists every user account.
    async fn list_users(&self) -> AppResult<Vec<UserAccount>>;

    /// Looks up one user by identifier.
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserAccount>>;

    /// Creates a user account and returns it with its assigned identifier.
    async fn create_user(&self, input: CreateUserInput) -> AppResult<UserAccount>;

    /// Replaces a user account's editable attributes.
    async fn update_user(&self, id: UserId, input: UpdateUserInput) -> AppResult<UserAccount>;

    /// Deletes a user account.
    async fn delete_user(&self, id: UserId) -> AppResult<()>;

    /// Lists the role assignments of one user.
    async fn list_role_assignments(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>>;

    /// Assigns a role to a user with a validity window.
    async fn assign_role(
        &self,
        user_id: UserId,
        input: AssignRoleInput,
    ) -> AppResult<RoleAssignment>;

    /// Removes a role assignment from a user.
    async fn unassign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;
}
