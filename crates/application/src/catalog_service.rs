//! Application service for permission catalog administration.

use std::sync::Arc;

use clavis_core::{AppError, AppResult};
use clavis_domain::{PermissionDefinition, PermissionId, validate_url_pattern};

use crate::access_ports::{CreatePermissionInput, PermissionCatalog, UpdatePermissionInput};

/// CRUD operations over the permission catalog with client-side validation.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn PermissionCatalog>,
}

impl CatalogService {
    /// Creates a new service from a catalog port implementation.
    #[must_use]
    pub fn new(catalog: Arc<dyn PermissionCatalog>) -> Self {
        Self { catalog }
    }

    /// Lists every catalog permission.
    pub async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        self.catalog.list_permissions().await
    }

    /// Returns one permission or a not-found error.
    pub async fn get_permission(&self, id: PermissionId) -> AppResult<PermissionDefinition> {
        self.catalog
            .find_permission(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("permission {id} does not exist")))
    }

    /// Creates a permission after validating the URL pattern locally.
    pub async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        validate_url_pattern(input.url.as_str())?;
        self.catalog.create_permission(input).await
    }

    /// Replaces a permission after validating the URL pattern locally.
    pub async fn update_permission(
        &self,
        id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        validate_url_pattern(input.url.as_str())?;
        self.catalog.update_permission(id, input).await
    }

    /// Deletes a permission from the catalog.
    pub async fn delete_permission(&self, id: PermissionId) -> AppResult<()> {
        self.catalog.delete_permission(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use clavis_core::{AppError, AppResult};
    use clavis_domain::{HttpMethod, PermissionDefinition, PermissionId};

    use crate::access_ports::{CreatePermissionInput, PermissionCatalog, UpdatePermissionInput};

    use super::CatalogService;

    #[derive(Default)]
    struct FakeCatalog {
        permissions: Mutex<Vec<PermissionDefinition>>,
    }

    #[async_trait]
    impl PermissionCatalog for FakeCatalog {
        async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
            Ok(self.permissions.lock().await.clone())
        }

        async fn find_permission(
            &self,
            id: PermissionId,
        ) -> AppResult<Option<PermissionDefinition>> {
            Ok(self
                .permissions
                .lock()
                .await
                .iter()
                .find(|permission| permission.id() == id)
                .cloned())
        }

        async fn create_permission(
            &self,
            input: CreatePermissionInput,
        ) -> AppResult<PermissionDefinition> {
            let mut permissions = self.permissions.lock().await;
            let id = PermissionId::from_i64(permissions.len() as i64 + 1);
            let created = PermissionDefinition::new(id, input.url, input.method)?;
            permissions.push(created.clone());
            Ok(created)
        }

        async fn update_permission(
            &self,
            id: PermissionId,
            input: UpdatePermissionInput,
        ) -> AppResult<PermissionDefinition> {
            let updated = PermissionDefinition::new(id, input.url, input.method)?;
            let mut permissions = self.permissions.lock().await;
            for stored in permissions.iter_mut() {
                if stored.id() == id {
                    *stored = updated.clone();
                    return Ok(updated);
                }
            }
            Err(AppError::NotFound(format!("permission {id} does not exist")))
        }

        async fn delete_permission(&self, id: PermissionId) -> AppResult<()> {
            self.permissions
                .lock()
                .await
                .retain(|permission| permission.id() != id);
            Ok(())
        }
    }

    fn service() -> (CatalogService, Arc<FakeCatalog>) {
        let catalog = Arc::new(FakeCatalog::default());
        (CatalogService::new(catalog.clone()), catalog)
    }

    #[tokio::test]
    async fn create_rejects_a_relative_url_before_calling_the_backend() {
        let (service, catalog) = service();

        let created = service
            .create_permission(CreatePermissionInput {
                url: "users".to_owned(),
                method: HttpMethod::Get,
            })
            .await;

        assert!(matches!(created, Err(AppError::Validation(_))));
        assert!(catalog.permissions.lock().await.is_empty());
    }

    #[tokio::test]
    async fn create_returns_the_assigned_identifier() {
        let (service, _) = service();

        let created = service
            .create_permission(CreatePermissionInput {
                url: "/devices".to_owned(),
                method: HttpMethod::Post,
            })
            .await;

        assert!(created.is_ok());
        let created = created.unwrap_or_else(|_| unreachable!());
        assert_eq!(created.id(), PermissionId::from_i64(1));
        assert_eq!(created.url(), "/devices");
    }

    #[tokio::test]
    async fn get_maps_a_missing_permission_to_not_found() {
        let (service, _) = service();

        let fetched = service.get_permission(PermissionId::from_i64(42)).await;

        assert!(matches!(fetched, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_rejects_a_relative_url() {
        let (service, _) = service();

        let updated = service
            .update_permission(
                PermissionId::from_i64(1),
                UpdatePermissionInput {
                    url: "no-slash".to_owned(),
                    method: HttpMethod::Put,
                },
            )
            .await;

        assert!(matches!(updated, Err(AppError::Validation(_))));
    }
}
