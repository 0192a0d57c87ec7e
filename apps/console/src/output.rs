//! Output rendering for console commands.
//!
//! The format is resolved once at startup from the `--json` flag and passed
//! down with the context, so every command renders the same way for the
//! whole invocation.

use serde::Serialize;

use clavis_application::{MatrixRow, PermissionMatrix, RoleAssignment};
use clavis_core::{AppError, AppResult};
use clavis_domain::{CrudIntent, PermissionDefinition, RoleDefinition, UserAccount};

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable aligned tables.
    Table,
    /// Machine-readable JSON.
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Table }
    }
}

/// Prints `value` as pretty JSON on stdout.
pub fn emit_json<T: Serialize>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render JSON output: {error}")))?;
    println!("{rendered}");
    Ok(())
}

/// Marks a boolean matrix cell.
#[must_use]
pub fn mark(flag: bool) -> &'static str {
    if flag { "x" } else { "-" }
}

#[derive(Debug, Serialize)]
pub struct PermissionReport {
    pub id: i64,
    pub url: String,
    pub method: String,
}

impl From<&PermissionDefinition> for PermissionReport {
    fn from(permission: &PermissionDefinition) -> Self {
        Self {
            id: permission.id().as_i64(),
            url: permission.url().to_owned(),
            method: permission.method().as_str().to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleReport {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl From<&RoleDefinition> for RoleReport {
    fn from(role: &RoleDefinition) -> Self {
        Self {
            id: role.id().as_i64(),
            name: role.name().to_owned(),
            description: role.description().to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserReport {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub enabled: bool,
}

impl From<&UserAccount> for UserReport {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id().as_i64(),
            username: user.username().to_owned(),
            email: user.email().map(|email| email.as_str().to_owned()),
            enabled: user.is_enabled(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentReport {
    pub user_id: i64,
    pub role_id: i64,
    pub role_name: String,
    pub valid_from: String,
    pub valid_until: Option<String>,
}

impl From<&RoleAssignment> for AssignmentReport {
    fn from(assignment: &RoleAssignment) -> Self {
        Self {
            user_id: assignment.user_id.as_i64(),
            role_id: assignment.role_id.as_i64(),
            role_name: assignment.role_name.clone(),
            valid_from: assignment.valid_from.to_rfc3339(),
            valid_until: assignment.valid_until.map(|until| until.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatrixRowReport {
    pub entity: String,
    pub view: bool,
    pub list: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl From<&MatrixRow> for MatrixRowReport {
    fn from(row: &MatrixRow) -> Self {
        Self {
            entity: row.entity().to_owned(),
            view: row.flag(CrudIntent::View),
            list: row.flag(CrudIntent::List),
            create: row.flag(CrudIntent::Create),
            update: row.flag(CrudIntent::Update),
            delete: row.flag(CrudIntent::Delete),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatrixReport {
    pub role_id: i64,
    pub rows: Vec<MatrixRowReport>,
}

impl From<&PermissionMatrix> for MatrixReport {
    fn from(matrix: &PermissionMatrix) -> Self {
        Self {
            role_id: matrix.role_id().as_i64(),
            rows: matrix.rows().iter().map(MatrixRowReport::from).collect(),
        }
    }
}

/// Outcome summary of a matrix toggle.
#[derive(Debug, Serialize)]
pub struct ToggleReport {
    pub entity: String,
    pub action: String,
    pub changed: bool,
    pub granted: Option<bool>,
    pub calls: usize,
}
