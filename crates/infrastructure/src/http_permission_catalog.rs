//! HTTP adapter for the permission catalog service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use clavis_application::{CreatePermissionInput, PermissionCatalog, UpdatePermissionInput};
use clavis_core::{AppError, AppResult};
use clavis_domain::{HttpMethod, PermissionDefinition, PermissionId};

use crate::rest_client::RestApiClient;

/// Permission catalog adapter over the backend REST API.
#[derive(Debug, Clone)]
pub struct HttpPermissionCatalog {
    client: RestApiClient,
}

impl HttpPermissionCatalog {
    /// Creates the adapter from a shared API client.
    #[must_use]
    pub fn new(client: RestApiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct PermissionRecord {
    id: i64,
    url: String,
    method: String,
}

#[derive(Debug, Serialize)]
struct PermissionRequest<'a> {
    url: &'a str,
    method: &'a str,
}

impl PermissionRecord {
    fn into_domain(self) -> AppResult<PermissionDefinition> {
        PermissionDefinition::new(
            PermissionId::from_i64(self.id),
            self.url,
            HttpMethod::parse(self.method.as_str()),
        )
    }
}

#[async_trait]
impl PermissionCatalog for HttpPermissionCatalog {
    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        let records = self
            .client
            .get_json::<Vec<PermissionRecord>>("/permissions")
            .await?;

        records
            .into_iter()
            .map(PermissionRecord::into_domain)
            .collect()
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<PermissionDefinition>> {
        let path = format!("/permissions/{id}");
        match self.client.get_json::<PermissionRecord>(path.as_str()).await {
            Ok(record) => record.into_domain().map(Some),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        let record = self
            .client
            .post_json::<_, PermissionRecord>(
                "/permissions",
                &PermissionRequest {
                    url: input.url.as_str(),
                    method: input.method.as_str(),
                },
            )
            .await?;

        record.into_domain()
    }

    async fn update_permission(
        &self,
        id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        let path = format!("/permissions/{id}");
        let record = self
            .client
            .put_json::<_, PermissionRecord>(
                path.as_str(),
                &PermissionRequest {
                    url: input.url.as_str(),
                    method: input.method.as_str(),
                },
            )
            .await?;

        record.into_domain()
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<()> {
        let path = format!("/permissions/{id}");
        self.client.delete(path.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post, put};
    use serde_json::json;

    use clavis_application::{CreatePermissionInput, PermissionCatalog, UpdatePermissionInput};
    use clavis_core::AppError;
    use clavis_domain::{HttpMethod, PermissionId};

    use crate::rest_client::{ApiCredentials, RestApiClient};
    use crate::test_support;

    use super::HttpPermissionCatalog;

    fn catalog_for(base_url: &str) -> HttpPermissionCatalog {
        let client = RestApiClient::new(
            reqwest::Client::new(),
            base_url,
            ApiCredentials::anonymous(),
        )
        .unwrap_or_else(|_| panic!("test client"));
        HttpPermissionCatalog::new(client)
    }

    #[tokio::test]
    async fn listed_permissions_are_decoded_into_domain_values() {
        let router = axum::Router::new().route(
            "/permissions",
            get(|| async {
                Json(json!([
                    { "id": 1, "url": "/users", "method": "GET" },
                    { "id": 2, "url": "/users/?", "method": "get" }
                ]))
            }),
        );
        let base_url = test_support::serve(router).await;
        let catalog = catalog_for(base_url.as_str());

        let permissions = catalog.list_permissions().await;

        assert!(permissions.is_ok());
        let permissions = permissions.unwrap_or_default();
        assert_eq!(permissions.len(), 2);
        assert_eq!(permissions[0].url(), "/users");
        assert_eq!(permissions[1].method(), &HttpMethod::Get);
    }

    #[tokio::test]
    async fn missing_permission_reads_as_none() {
        let router = axum::Router::new().route(
            "/permissions/{id}",
            get(|| async { StatusCode::NOT_FOUND }),
        );
        let base_url = test_support::serve(router).await;
        let catalog = catalog_for(base_url.as_str());

        let found = catalog.find_permission(PermissionId::from_i64(42)).await;

        assert!(matches!(found, Ok(None)));
    }

    #[tokio::test]
    async fn create_sends_the_pattern_and_returns_the_assigned_id() {
        let router = axum::Router::new().route(
            "/permissions",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body, json!({ "url": "/devices", "method": "POST" }));
                Json(json!({ "id": 7, "url": "/devices", "method": "POST" }))
            }),
        );
        let base_url = test_support::serve(router).await;
        let catalog = catalog_for(base_url.as_str());

        let created = catalog
            .create_permission(CreatePermissionInput {
                url: "/devices".to_owned(),
                method: HttpMethod::Post,
            })
            .await;

        assert!(created.is_ok());
        assert_eq!(
            created.map(|permission| permission.id()).ok(),
            Some(PermissionId::from_i64(7))
        );
    }

    #[tokio::test]
    async fn update_conflict_surfaces_as_conflict() {
        let router = axum::Router::new().route(
            "/permissions/{id}",
            put(|Path(id): Path<i64>| async move {
                assert_eq!(id, 7);
                StatusCode::CONFLICT
            }),
        );
        let base_url = test_support::serve(router).await;
        let catalog = catalog_for(base_url.as_str());

        let updated = catalog
            .update_permission(
                PermissionId::from_i64(7),
                UpdatePermissionInput {
                    url: "/devices".to_owned(),
                    method: HttpMethod::Put,
                },
            )
            .await;

        assert!(matches!(updated, Err(AppError::Conflict(_))));
    }
}
