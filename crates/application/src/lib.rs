//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod catalog_service;
mod grant_reconciler;
mod role_admin_service;
mod user_admin_service;

pub use access_ports::{
    AssignRoleInput, CreatePermissionInput, CreateRoleInput, CreateUserInput, GrantStore,
    PermissionCatalog, RoleAssignment, RoleDirectory, UpdatePermissionInput, UpdateRoleInput,
    UpdateUserInput, UserDirectory,
};
pub use catalog_service::CatalogService;
pub use grant_reconciler::{
    FlagState, GrantReconciler, MatrixRow, PermissionMatrix, ToggleOutcome,
};
pub use role_admin_service::RoleAdminService;
pub use user_admin_service::UserAdminService;
