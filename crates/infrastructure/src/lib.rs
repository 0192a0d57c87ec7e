//! Infrastructure adapters for the application ports.
//!
//! HTTP adapters speak to the backend REST API; the in-memory store backs
//! demo sessions and tests.

#![forbid(unsafe_code)]

mod http_grant_store;
mod http_permission_catalog;
mod http_role_directory;
mod http_user_directory;
mod in_memory_access_store;
mod rest_client;
#[cfg(test)]
mod test_support;

pub use http_grant_store::HttpGrantStore;
pub use http_permission_catalog::HttpPermissionCatalog;
pub use http_role_directory::HttpRoleDirectory;
pub use http_user_directory::HttpUserDirectory;
pub use in_memory_access_store::InMemoryAccessStore;
pub use rest_client::{ApiCredentials, RestApiClient};
