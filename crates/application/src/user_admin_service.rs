//! Application service for user account administration.

use std::sync::Arc;

use chrono::Utc;

use clavis_core::{AppError, AppResult, NonEmptyString};
use clavis_domain::{EmailAddress, RoleId, UserAccount, UserId};

use crate::access_ports::{
    AssignRoleInput, CreateUserInput, RoleAssignment, UpdateUserInput, UserDirectory,
};

/// CRUD and role-assignment operations over user accounts.
#[derive(Clone)]
pub struct UserAdminService {
    users: Arc<dyn UserDirectory>,
}

impl UserAdminService {
    /// Creates a new service from a user directory port implementation.
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Lists every user account.
    pub async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        self.users.list_users().await
    }

    /// Returns one user or a not-found error.
    pub async fn get_user(&self, id: UserId) -> AppResult<UserAccount> {
        self.users
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id} does not exist")))
    }

    /// Creates a user after validating the username and email locally.
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<UserAccount> {
        validate_user_input(&input.username, input.email.as_deref())?;
        self.users.create_user(input).await
    }

    /// Replaces a user after validating the username and email locally.
    pub async fn update_user(&self, id: UserId, input: UpdateUserInput) -> AppResult<UserAccount> {
        validate_user_input(&input.username, input.email.as_deref())?;
        self.users.update_user(id, input).await
    }

    /// Deletes a user account.
    pub async fn delete_user(&self, id: UserId) -> AppResult<()> {
        self.users.delete_user(id).await
    }

    /// Lists the role assignments of one user.
    pub async fn list_role_assignments(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        self.users.list_role_assignments(user_id).await
    }

    /// Assigns a role to a user after validating the validity window.
    ///
    /// An absent start means the backend clock; an absent end means the
    /// assignment never expires.
    pub async fn assign_role(
        &self,
        user_id: UserId,
        input: AssignRoleInput,
    ) -> AppResult<RoleAssignment> {
        if let Some(until) = input.valid_until {
            let from = input.valid_from.unwrap_or_else(Utc::now);
            if until <= from {
                return Err(AppError::Validation(format!(
                    "assignment validity window ends at {until} before it starts at {from}"
                )));
            }
        }

        self.users.assign_role(user_id, input).await
    }

    /// Removes a role assignment from a user.
    pub async fn unassign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.users.unassign_role(user_id, role_id).await
    }
}

fn validate_user_input(username: &str, email: Option<&str>) -> AppResult<()> {
    NonEmptyString::new(username)?;
    if let Some(email) = email {
        EmailAddress::new(email)?;
    }
    Ok(())
}
