//! Seed fixtures for `--demo` sessions.

use tracing::info;

use clavis_application::{
    AssignRoleInput, CreatePermissionInput, CreateRoleInput, CreateUserInput, GrantStore,
    PermissionCatalog, RoleDirectory, UserDirectory,
};
use clavis_core::AppResult;
use clavis_domain::{HttpMethod, PermissionId};
use clavis_infrastructure::InMemoryAccessStore;

const DEMO_CATALOG: &[(&str, &str)] = &[
    ("/users", "GET"),
    ("/users/?", "GET"),
    ("/users", "POST"),
    ("/users/?", "PUT"),
    ("/users/?", "DELETE"),
    ("/roles", "GET"),
    ("/roles/?", "GET"),
    ("/roles", "POST"),
    ("/devices", "GET"),
    ("/devices/?", "GET"),
    ("/devices", "POST"),
    ("/devices/?/reboot", "POST"),
];

/// Fills `store` with a small catalog plus demo roles and users.
pub async fn run(store: &InMemoryAccessStore) -> AppResult<()> {
    let mut permission_ids = Vec::with_capacity(DEMO_CATALOG.len());
    for (url, method) in DEMO_CATALOG {
        let created = store
            .create_permission(CreatePermissionInput {
                url: (*url).to_owned(),
                method: HttpMethod::parse(method),
            })
            .await?;
        permission_ids.push(created.id());
    }

    let administrators = store
        .create_role(CreateRoleInput {
            name: "administrators".to_owned(),
            description: "full access to every operation".to_owned(),
        })
        .await?;
    let operators = store
        .create_role(CreateRoleInput {
            name: "operators".to_owned(),
            description: "read access plus device operations".to_owned(),
        })
        .await?;

    for permission_id in &permission_ids {
        store.grant(administrators.id(), *permission_id).await?;
    }
    for permission_id in operator_grants(&permission_ids) {
        store.grant(operators.id(), permission_id).await?;
    }

    let ada = store
        .create_user(CreateUserInput {
            username: "ada".to_owned(),
            email: Some("ada@example.com".to_owned()),
            enabled: true,
        })
        .await?;
    store
        .create_user(CreateUserInput {
            username: "grace".to_owned(),
            email: None,
            enabled: false,
        })
        .await?;

    store
        .assign_role(
            ada.id(),
            AssignRoleInput {
                role_id: operators.id(),
                valid_from: None,
                valid_until: None,
            },
        )
        .await?;

    info!(
        permissions = permission_ids.len(),
        roles = 2,
        users = 2,
        "seeded demo backend"
    );
    Ok(())
}

/// Operators can read everything and drive device actions, nothing more.
fn operator_grants(permission_ids: &[PermissionId]) -> Vec<PermissionId> {
    DEMO_CATALOG
        .iter()
        .zip(permission_ids)
        .filter(|((url, method), _)| *method == "GET" || url.starts_with("/devices"))
        .map(|(_, permission_id)| *permission_id)
        .collect()
}
