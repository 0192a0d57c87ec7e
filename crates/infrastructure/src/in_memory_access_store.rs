//! In-memory implementation of every backend port.
//!
//! Backs demo sessions and tests that need a full IAM backend without a
//! running server. Listings are sorted so output is stable across runs.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use clavis_application::{
    AssignRoleInput, CreatePermissionInput, CreateRoleInput, CreateUserInput, GrantStore,
    PermissionCatalog, RoleAssignment, RoleDirectory, UpdatePermissionInput, UpdateRoleInput,
    UpdateUserInput, UserDirectory,
};
use clavis_core::{AppError, AppResult};
use clavis_domain::{
    GrantedPermission, PermissionDefinition, PermissionGroup, PermissionId, RoleDefinition, RoleId,
    UserAccount, UserId,
};

/// Shared in-memory store behind all four backend ports.
#[derive(Debug, Default)]
pub struct InMemoryAccessStore {
    permissions: RwLock<HashMap<i64, PermissionDefinition>>,
    roles: RwLock<HashMap<i64, RoleDefinition>>,
    users: RwLock<HashMap<i64, UserAccount>>,
    grants: RwLock<HashSet<(i64, i64)>>,
    assignments: RwLock<Vec<RoleAssignment>>,
}

impl InMemoryAccessStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id<V>(entries: &HashMap<i64, V>) -> i64 {
    entries.keys().max().map_or(1, |highest| highest + 1)
}

/// Derives the entity bucket of a permission from its URL pattern.
fn entity_of(url: &str) -> &str {
    url.split('/').find(|segment| !segment.is_empty()).unwrap_or(url)
}

#[async_trait]
impl PermissionCatalog for InMemoryAccessStore {
    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        let permissions = self.permissions.read().await;
        let mut listing: Vec<_> = permissions.values().cloned().collect();
        listing.sort_by_key(PermissionDefinition::id);
        Ok(listing)
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<PermissionDefinition>> {
        let permissions = self.permissions.read().await;
        Ok(permissions.get(&id.as_i64()).cloned())
    }

    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        let mut permissions = self.permissions.write().await;
        let id = next_id(&permissions);
        let candidate =
            PermissionDefinition::new(PermissionId::from_i64(id), input.url, input.method)?;

        let duplicate = permissions.values().any(|existing| {
            existing.url() == candidate.url() && existing.method() == candidate.method()
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "permission {} {} already exists",
                candidate.method().as_str(),
                candidate.url()
            )));
        }

        permissions.insert(id, candidate.clone());
        Ok(candidate)
    }

    async fn update_permission(
        &self,
        id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        let mut permissions = self.permissions.write().await;
        if !permissions.contains_key(&id.as_i64()) {
            return Err(AppError::NotFound(format!("permission {id} does not exist")));
        }

        let candidate = PermissionDefinition::new(id, input.url, input.method)?;
        let duplicate = permissions.values().any(|existing| {
            existing.id() != id
                && existing.url() == candidate.url()
                && existing.method() == candidate.method()
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "permission {} {} already exists",
                candidate.method().as_str(),
                candidate.url()
            )));
        }

        permissions.insert(id.as_i64(), candidate.clone());
        Ok(candidate)
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        let grants = self.grants.read().await;

        if !permissions.contains_key(&id.as_i64()) {
            return Err(AppError::NotFound(format!("permission {id} does not exist")));
        }
        if grants.iter().any(|(_, permission_id)| *permission_id == id.as_i64()) {
            return Err(AppError::Conflict(format!(
                "permission {id} is still granted to at least one role"
            )));
        }

        permissions.remove(&id.as_i64());
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for InMemoryAccessStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let roles = self.roles.read().await;
        let mut listing: Vec<_> = roles.values().cloned().collect();
        listing.sort_by_key(RoleDefinition::id);
        Ok(listing)
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<RoleDefinition>> {
        let roles = self.roles.read().await;
        Ok(roles.get(&id.as_i64()).cloned())
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.write().await;
        let id = next_id(&roles);
        let candidate = RoleDefinition::new(RoleId::from_i64(id), input.name, input.description)?;

        if roles.values().any(|existing| existing.name() == candidate.name()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                candidate.name()
            )));
        }

        roles.insert(id, candidate.clone());
        Ok(candidate)
    }

    async fn update_role(&self, id: RoleId, input: UpdateRoleInput) -> AppResult<RoleDefinition> {
        let mut roles = self.roles.write().await;
        if !roles.contains_key(&id.as_i64()) {
            return Err(AppError::NotFound(format!("role {id} does not exist")));
        }

        let candidate = RoleDefinition::new(id, input.name, input.description)?;
        let duplicate = roles
            .values()
            .any(|existing| existing.id() != id && existing.name() == candidate.name());
        if duplicate {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                candidate.name()
            )));
        }

        roles.insert(id.as_i64(), candidate.clone());
        Ok(candidate)
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let grants = self.grants.read().await;
        let assignments = self.assignments.read().await;

        if !roles.contains_key(&id.as_i64()) {
            return Err(AppError::NotFound(format!("role {id} does not exist")));
        }
        if grants.iter().any(|(role_id, _)| *role_id == id.as_i64()) {
            return Err(AppError::Conflict(format!(
                "role {id} still holds permission grants"
            )));
        }
        if assignments.iter().any(|assignment| assignment.role_id == id) {
            return Err(AppError::Conflict(format!(
                "role {id} is still assigned to at least one user"
            )));
        }

        roles.remove(&id.as_i64());
        Ok(())
    }
}

#[async_trait]
impl GrantStore for InMemoryAccessStore {
    async fn grouped_for_role(&self, role_id: RoleId) -> AppResult<Vec<PermissionGroup>> {
        let permissions = self.permissions.read().await;
        let roles = self.roles.read().await;
        let grants = self.grants.read().await;

        if !roles.contains_key(&role_id.as_i64()) {
            return Ok(Vec::new());
        }

        let mut catalog: Vec<_> = permissions.values().cloned().collect();
        catalog.sort_by_key(PermissionDefinition::id);

        let mut buckets: BTreeMap<String, Vec<GrantedPermission>> = BTreeMap::new();
        for permission in catalog {
            let entity = entity_of(permission.url()).to_owned();
            let granted = grants.contains(&(role_id.as_i64(), permission.id().as_i64()));
            buckets
                .entry(entity)
                .or_default()
                .push(GrantedPermission::new(permission, granted));
        }

        buckets
            .into_iter()
            .map(|(entity, members)| PermissionGroup::new(entity, members))
            .collect()
    }

    async fn grant(&self, role_id: RoleId, permission_id: PermissionId) -> AppResult<()> {
        let permissions = self.permissions.read().await;
        let roles = self.roles.read().await;
        let mut grants = self.grants.write().await;

        if !roles.contains_key(&role_id.as_i64()) {
            return Err(AppError::NotFound(format!("role {role_id} does not exist")));
        }
        if !permissions.contains_key(&permission_id.as_i64()) {
            return Err(AppError::NotFound(format!(
                "permission {permission_id} does not exist"
            )));
        }

        grants.insert((role_id.as_i64(), permission_id.as_i64()));
        Ok(())
    }

    async fn revoke(&self, role_id: RoleId, permission_id: PermissionId) -> AppResult<()> {
        let mut grants = self.grants.write().await;
        grants.remove(&(role_id.as_i64(), permission_id.as_i64()));
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryAccessStore {
    async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        let users = self.users.read().await;
        let mut listing: Vec<_> = users.values().cloned().collect();
        listing.sort_by_key(UserAccount::id);
        Ok(listing)
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<UserAccount>> {
        let users = self.users.read().await;
        Ok(users.get(&id.as_i64()).cloned())
    }

    async fn create_user(&self, input: CreateUserInput) -> AppResult<UserAccount> {
        let mut users = self.users.write().await;
        let id = next_id(&users);
        let candidate =
            UserAccount::new(UserId::from_i64(id), input.username, input.email, input.enabled)?;

        if users.values().any(|existing| existing.username() == candidate.username()) {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                candidate.username()
            )));
        }

        users.insert(id, candidate.clone());
        Ok(candidate)
    }

    async fn update_user(&self, id: UserId, input: UpdateUserInput) -> AppResult<UserAccount> {
        let mut users = self.users.write().await;
        if !users.contains_key(&id.as_i64()) {
            return Err(AppError::NotFound(format!("user {id} does not exist")));
        }

        let candidate = UserAccount::new(id, input.username, input.email, input.enabled)?;
        let duplicate = users
            .values()
            .any(|existing| existing.id() != id && existing.username() == candidate.username());
        if duplicate {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                candidate.username()
            )));
        }

        users.insert(id.as_i64(), candidate.clone());
        Ok(candidate)
    }

    async fn delete_user(&self, id: UserId) -> AppResult<()> {
        let mut users = self.users.write().await;
        let mut assignments = self.assignments.write().await;

        if users.remove(&id.as_i64()).is_none() {
            return Err(AppError::NotFound(format!("user {id} does not exist")));
        }

        // Assignments are a sub-resource of the user and go with it.
        assignments.retain(|assignment| assignment.user_id != id);
        Ok(())
    }

    async fn list_role_assignments(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        let assignments = self.assignments.read().await;
        let mut listing: Vec<_> = assignments
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .cloned()
            .collect();
        listing.sort_by_key(|assignment| assignment.role_id);
        Ok(listing)
    }

    async fn assign_role(
        &self,
        user_id: UserId,
        input: AssignRoleInput,
    ) -> AppResult<RoleAssignment> {
        let roles = self.roles.read().await;
        let users = self.users.read().await;
        let mut assignments = self.assignments.write().await;

        if !users.contains_key(&user_id.as_i64()) {
            return Err(AppError::NotFound(format!("user {user_id} does not exist")));
        }
        let Some(role) = roles.get(&input.role_id.as_i64()) else {
            return Err(AppError::NotFound(format!(
                "role {} does not exist",
                input.role_id
            )));
        };

        let already_assigned = assignments
            .iter()
            .any(|assignment| assignment.user_id == user_id && assignment.role_id == input.role_id);
        if already_assigned {
            return Err(AppError::Conflict(format!(
                "user {user_id} already holds role {}",
                input.role_id
            )));
        }

        let assignment = RoleAssignment {
            user_id,
            role_id: input.role_id,
            role_name: role.name().to_owned(),
            valid_from: input.valid_from.unwrap_or_else(Utc::now),
            valid_until: input.valid_until,
        };
        assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn unassign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        let position = assignments
            .iter()
            .position(|assignment| assignment.user_id == user_id && assignment.role_id == role_id);

        let Some(position) = position else {
            return Err(AppError::NotFound(format!(
                "user {user_id} does not hold role {role_id}"
            )));
        };

        assignments.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
