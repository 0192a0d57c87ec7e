//! HTTP adapter for the role-permission grant store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use clavis_application::GrantStore;
use clavis_core::{AppError, AppResult};
use clavis_domain::{
    GrantedPermission, HttpMethod, PermissionDefinition, PermissionGroup, PermissionId, RoleId,
};

use crate::rest_client::RestApiClient;

/// Grant store adapter over the backend REST API.
#[derive(Debug, Clone)]
pub struct HttpGrantStore {
    client: RestApiClient,
}

impl HttpGrantStore {
    /// Creates the adapter from a shared API client.
    #[must_use]
    pub fn new(client: RestApiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct PermissionGroupRecord {
    entity: String,
    permissions: Vec<GrantedPermissionRecord>,
}

#[derive(Debug, Deserialize)]
struct GrantedPermissionRecord {
    id: i64,
    url: String,
    method: String,
    has_permission: bool,
}

#[derive(Debug, Serialize)]
struct GrantRequest {
    role_id: i64,
    permission_id: i64,
}

impl PermissionGroupRecord {
    fn into_domain(self) -> AppResult<PermissionGroup> {
        let permissions = self
            .permissions
            .into_iter()
            .map(GrantedPermissionRecord::into_domain)
            .collect::<AppResult<Vec<_>>>()?;

        PermissionGroup::new(self.entity, permissions)
    }
}

impl GrantedPermissionRecord {
    fn into_domain(self) -> AppResult<GrantedPermission> {
        let permission = PermissionDefinition::new(
            PermissionId::from_i64(self.id),
            self.url,
            HttpMethod::parse(self.method.as_str()),
        )?;

        Ok(GrantedPermission::new(permission, self.has_permission))
    }
}

#[async_trait]
impl GrantStore for HttpGrantStore {
    async fn grouped_for_role(&self, role_id: RoleId) -> AppResult<Vec<PermissionGroup>> {
        let path = format!("/permissions/grouped/role/{role_id}");
        let records = match self
            .client
            .get_json::<Vec<PermissionGroupRecord>>(path.as_str())
            .await
        {
            Ok(records) => records,
            Err(AppError::NotFound(_)) => {
                debug!(role_id = %role_id, "no grouped permissions for role");
                return Ok(Vec::new());
            }
            Err(error) => return Err(error),
        };

        records
            .into_iter()
            .map(PermissionGroupRecord::into_domain)
            .collect()
    }

    async fn grant(&self, role_id: RoleId, permission_id: PermissionId) -> AppResult<()> {
        self.client
            .post_no_content(
                "/role-permissions",
                &GrantRequest {
                    role_id: role_id.as_i64(),
                    permission_id: permission_id.as_i64(),
                },
            )
            .await
    }

    async fn revoke(&self, role_id: RoleId, permission_id: PermissionId) -> AppResult<()> {
        let path = format!("/role-permissions/{role_id}/{permission_id}");
        match self.client.delete(path.as_str()).await {
            Ok(()) => Ok(()),
            Err(AppError::NotFound(_)) => {
                debug!(
                    role_id = %role_id,
                    permission_id = %permission_id,
                    "revoke target was already absent"
                );
                Ok(())
            }
            Err(error) => Err(error),
        }
    }
}
