//! HTTP adapter for the role service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use clavis_application::{CreateRoleInput, RoleDirectory, UpdateRoleInput};
use clavis_core::{AppError, AppResult};
use clavis_domain::{RoleDefinition, RoleId};

use crate::rest_client::RestApiClient;

/// Role service adapter over the backend REST API.
#[derive(Debug, Clone)]
pub struct HttpRoleDirectory {
    client: RestApiClient,
}

impl HttpRoleDirectory {
    /// Creates the adapter from a shared API client.
    #[must_use]
    pub fn new(client: RestApiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct RoleRecord {
    id: i64,
    name: String,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct RoleRequest<'a> {
    name: &'a str,
    description: &'a str,
}

impl RoleRecord {
    fn into_domain(self) -> AppResult<RoleDefinition> {
        RoleDefinition::new(
            RoleId::from_i64(self.id),
            self.name,
            self.description.unwrap_or_default(),
        )
    }
}

#[async_trait]
impl RoleDirectory for HttpRoleDirectory {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let records = self.client.get_json::<Vec<RoleRecord>>("/roles").await?;

        records.into_iter().map(RoleRecord::into_domain).collect()
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<RoleDefinition>> {
        let path = format!("/roles/{id}");
        match self.client.get_json::<RoleRecord>(path.as_str()).await {
            Ok(record) => record.into_domain().map(Some),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        let record = self
            .client
            .post_json::<_, RoleRecord>(
                "/roles",
                &RoleRequest {
                    name: input.name.as_str(),
                    description: input.description.as_str(),
                },
            )
            .await?;

        record.into_domain()
    }

    async fn update_role(&self, id: RoleId, input: UpdateRoleInput) -> AppResult<RoleDefinition> {
        let path = format!("/roles/{id}");
        let record = self
            .client
            .put_json::<_, RoleRecord>(
                path.as_str(),
                &RoleRequest {
                    name: input.name.as_str(),
                    description: input.description.as_str(),
                },
            )
            .await?;

        record.into_domain()
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<()> {
        let path = format!("/roles/{id}");
        self.client.delete(path.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::routing::{delete, get, post};
    use serde_json::json;

    use clavis_application::{CreateRoleInput, RoleDirectory};
    use clavis_core::AppError;
    use clavis_domain::RoleId;

    use crate::rest_client::{ApiCredentials, RestApiClient};
    use crate::test_support;

    use super::HttpRoleDirectory;

    fn directory_for(base_url: &str) -> HttpRoleDirectory {
        let client = RestApiClient::new(
            reqwest::Client::new(),
            base_url,
            ApiCredentials::anonymous(),
        )
        .unwrap_or_else(|_| panic!("test client"));
        HttpRoleDirectory::new(client)
    }

    #[tokio::test]
    async fn listed_roles_tolerate_a_missing_description() {
        let router = axum::Router::new().route(
            "/roles",
            get(|| async {
                Json(json!([
                    { "id": 5, "name": "operators", "description": "device operators" },
                    { "id": 6, "name": "auditors" }
                ]))
            }),
        );
        let base_url = test_support::serve(router).await;
        let directory = directory_for(base_url.as_str());

        let roles = directory.list_roles().await;

        assert!(roles.is_ok());
        let roles = roles.unwrap_or_default();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].description(), "device operators");
        assert_eq!(roles[1].description(), "");
    }

    #[tokio::test]
    async fn create_posts_name_and_description() {
        let router = axum::Router::new().route(
            "/roles",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(
                    body,
                    json!({ "name": "operators", "description": "device operators" })
                );
                Json(json!({ "id": 5, "name": "operators", "description": "device operators" }))
            }),
        );
        let base_url = test_support::serve(router).await;
        let directory = directory_for(base_url.as_str());

        let created = directory
            .create_role(CreateRoleInput {
                name: "operators".to_owned(),
                description: "device operators".to_owned(),
            })
            .await;

        assert!(created.is_ok());
        assert_eq!(
            created.map(|role| role.id()).ok(),
            Some(RoleId::from_i64(5))
        );
    }

    #[tokio::test]
    async fn missing_role_reads_as_none() {
        let router = axum::Router::new()
            .route("/roles/{id}", get(|| async { StatusCode::NOT_FOUND }));
        let base_url = test_support::serve(router).await;
        let directory = directory_for(base_url.as_str());

        let found = directory.find_role(RoleId::from_i64(99)).await;

        assert!(matches!(found, Ok(None)));
    }

    #[tokio::test]
    async fn deleting_a_referenced_role_surfaces_as_conflict() {
        let router = axum::Router::new()
            .route("/roles/{id}", delete(|| async { StatusCode::CONFLICT }));
        let base_url = test_support::serve(router).await;
        let directory = directory_for(base_url.as_str());

        let deleted = directory.delete_role(RoleId::from_i64(5)).await;

        assert!(matches!(deleted, Err(AppError::Conflict(_))));
    }
}
