//! Application service for role administration.

use std::sync::Arc;

use clavis_core::{AppError, AppResult, NonEmptyString};
use clavis_domain::{RoleDefinition, RoleId};

use crate::access_ports::{CreateRoleInput, RoleDirectory, UpdateRoleInput};

/// CRUD operations over roles with client-side validation.
#[derive(Clone)]
pub struct RoleAdminService {
    roles: Arc<dyn RoleDirectory>,
}

impl RoleAdminService {
    /// Creates a new service from a role directory port implementation.
    #[must_use]
    pub fn new(roles: Arc<dyn RoleDirectory>) -> Self {
        Self { roles }
    }

    /// Lists every role.
    pub async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.roles.list_roles().await
    }

    /// Returns one role or a not-found error.
    pub async fn get_role(&self, id: RoleId) -> AppResult<RoleDefinition> {
        self.roles
            .find_role(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role {id} does not exist")))
    }

    /// Creates a role after validating the name locally.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        NonEmptyString::new(input.name.as_str())?;
        self.roles.create_role(input).await
    }

    /// Replaces a role after validating the name locally.
    pub async fn update_role(
        &self,
        id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<RoleDefinition> {
        NonEmptyString::new(input.name.as_str())?;
        self.roles.update_role(id, input).await
    }

    /// Deletes a role.
    pub async fn delete_role(&self, id: RoleId) -> AppResult<()> {
        self.roles.delete_role(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use clavis_core::{AppError, AppResult};
    use clavis_domain::{RoleDefinition, RoleId};

    use crate::access_ports::{CreateRoleInput, RoleDirectory, UpdateRoleInput};

    use super::RoleAdminService;

    #[derive(Default)]
    struct FakeRoleDirectory {
        roles: Mutex<Vec<RoleDefinition>>,
    }

    #[async_trait]
    impl RoleDirectory for FakeRoleDirectory {
        async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
            Ok(self.roles.lock().await.clone())
        }

        async fn find_role(&self, id: RoleId) -> AppResult<Option<RoleDefinition>> {
            Ok(self
                .roles
                .lock()
                .await
                .iter()
                .find(|role| role.id() == id)
                .cloned())
        }

        async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
            let mut roles = self.roles.lock().await;
            let id = RoleId::from_i64(roles.len() as i64 + 1);
            let created = RoleDefinition::new(id, input.name, input.description)?;
            roles.push(created.clone());
            Ok(created)
        }

        async fn update_role(
            &self,
            id: RoleId,
            input: UpdateRoleInput,
        ) -> AppResult<RoleDefinition> {
            let updated = RoleDefinition::new(id, input.name, input.description)?;
            let mut roles = self.roles.lock().await;
            for stored in roles.iter_mut() {
                if stored.id() == id {
                    *stored = updated.clone();
                    return Ok(updated);
                }
            }
            Err(AppError::NotFound(format!("role {id} does not exist")))
        }

        async fn delete_role(&self, id: RoleId) -> AppResult<()> {
            self.roles.lock().await.retain(|role| role.id() != id);
            Ok(())
        }
    }

    fn service() -> (RoleAdminService, Arc<FakeRoleDirectory>) {
        let roles = Arc::new(FakeRoleDirectory::default());
        (RoleAdminService::new(roles.clone()), roles)
    }

    #[tokio::test]
    async fn create_rejects_a_blank_name_before_calling_the_backend() {
        let (service, roles) = service();

        let created = service
            .create_role(CreateRoleInput {
                name: "   ".to_owned(),
                description: "anything".to_owned(),
            })
            .await;

        assert!(matches!(created, Err(AppError::Validation(_))));
        assert!(roles.roles.lock().await.is_empty());
    }

    #[tokio::test]
    async fn get_maps_a_missing_role_to_not_found() {
        let (service, _) = service();

        let fetched = service.get_role(RoleId::from_i64(9)).await;

        assert!(matches!(fetched, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn created_roles_are_listed() {
        let (service, _) = service();

        let created = service
            .create_role(CreateRoleInput {
                name: "auditors".to_owned(),
                description: "read-only access".to_owned(),
            })
            .await;
        assert!(created.is_ok());

        let listed = service.list_roles().await;
        assert_eq!(listed.unwrap_or_default().len(), 1);
    }
}
