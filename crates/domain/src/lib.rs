//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod crud_intent;
mod grant;
mod role;
mod user;

pub use catalog::{HttpMethod, PermissionDefinition, PermissionId, validate_url_pattern};
pub use crud_intent::{CrudIntent, classify, has_single_resource_marker};
pub use grant::{GrantedPermission, PermissionGroup};
pub use role::{RoleDefinition, RoleId};
pub use user::{EmailAddress, UserAccount, UserId};
