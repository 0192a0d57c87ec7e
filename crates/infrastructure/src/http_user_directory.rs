//! HTTP adapter for user account administration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clavis_application::{
    AssignRoleInput, CreateUserInput, RoleAssignment, UpdateUserInput, UserDirectory,
};
use clavis_core::{AppError, AppResult};
use clavis_domain::{RoleId, UserAccount, UserId};

use crate::rest_client::RestApiClient;

/// User administration adapter over the backend REST API.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: RestApiClient,
}

impl HttpUserDirectory {
    /// Creates the adapter from a shared API client.
    #[must_use]
    pub fn new(client: RestApiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: i64,
    username: String,
    email: Option<String>,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct UserRequest<'a> {
    username: &'a str,
    email: Option<&'a str>,
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct RoleAssignmentRecord {
    role_id: i64,
    role_name: String,
    valid_from: DateTime<Utc>,
    valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct AssignRoleRequest {
    role_id: i64,
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
}

impl UserRecord {
    fn into_domain(self) -> AppResult<UserAccount> {
        UserAccount::new(
            UserId::from_i64(self.id),
            self.username,
            self.email,
            self.enabled,
        )
    }
}

impl RoleAssignmentRecord {
    fn into_projection(self, user_id: UserId) -> RoleAssignment {
        RoleAssignment {
            user_id,
            role_id: RoleId::from_i64(self.role_id),
            role_name: self.role_name,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        let records = self.client.get_json::<Vec<UserRecord>>("/users").await?;

        records.into_iter().map(UserRecord::into_domain).collect()
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<UserAccount>> {
        let path = format!("/users/{id}");
        match self.client.get_json::<UserRecord>(path.as_str()).await {
            Ok(record) => record.into_domain().map(Some),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn create_user(&self, input: CreateUserInput) -> AppResult<UserAccount> {
        let record = self
            .client
            .post_json::<_, UserRecord>(
                "/users",
                &UserRequest {
                    username: input.username.as_str(),
                    email: input.email.as_deref(),
                    enabled: input.enabled,
                },
            )
            .await?;

        record.into_domain()
    }

    async fn update_user(&self, id: UserId, input: UpdateUserInput) -> AppResult<UserAccount> {
        let path = format!("/users/{id}");
        let record = self
            .client
            .put_json::<_, UserRecord>(
                path.as_str(),
                &UserRequest {
                    username: input.username.as_str(),
                    email: input.email.as_deref(),
                    enabled: input.enabled,
                },
            )
            .await?;

        record.into_domain()
    }

    async fn delete_user(&self, id: UserId) -> AppResult<()> {
        let path = format!("/users/{id}");
        self.client.delete(path.as_str()).await
    }

    async fn list_role_assignments(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        let path = format!("/users/{user_id}/roles");
        let records = self
            .client
            .get_json::<Vec<RoleAssignmentRecord>>(path.as_str())
            .await?;

        Ok(records
            .into_iter()
            .map(|record| record.into_projection(user_id))
            .collect())
    }

    async fn assign_role(
        &self,
        user_id: UserId,
        input: AssignRoleInput,
    ) -> AppResult<RoleAssignment> {
        let path = format!("/users/{user_id}/roles");
        let record = self
            .client
            .post_json::<_, RoleAssignmentRecord>(
                path.as_str(),
                &AssignRoleRequest {
                    role_id: input.role_id.as_i64(),
                    valid_from: input.valid_from,
                    valid_until: input.valid_until,
                },
            )
            .await?;

        Ok(record.into_projection(user_id))
    }

    async fn unassign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let path = format!("/users/{user_id}/roles/{role_id}");
        self.client.delete(path.as_str()).await
    }
}
