use std::sync::Arc;

use clavis_application::{
    AssignRoleInput, CreatePermissionInput, CreateRoleInput, CreateUserInput, GrantReconciler,
    GrantStore, PermissionCatalog, RoleDirectory, ToggleOutcome, UpdateRoleInput, UserDirectory,
};
use clavis_core::{AppError, AppResult};
use clavis_domain::{CrudIntent, HttpMethod, PermissionId, RoleId};

use super::InMemoryAccessStore;

async fn seed_permission(
    store: &InMemoryAccessStore,
    url: &str,
    method: HttpMethod,
) -> AppResult<PermissionId> {
    let created = store
        .create_permission(CreatePermissionInput {
            url: url.to_owned(),
            method,
        })
        .await?;
    Ok(created.id())
}

async fn seed_role(store: &InMemoryAccessStore, name: &str) -> AppResult<RoleId> {
    let created = store
        .create_role(CreateRoleInput {
            name: name.to_owned(),
            description: String::new(),
        })
        .await?;
    Ok(created.id())
}

#[tokio::test]
async fn duplicate_permission_pattern_is_a_conflict() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    seed_permission(&store, "/users", HttpMethod::Get).await?;

    let duplicate = store
        .create_permission(CreatePermissionInput {
            url: "/users".to_owned(),
            method: HttpMethod::Get,
        })
        .await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn deleting_a_granted_permission_is_a_conflict() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    let permission = seed_permission(&store, "/users", HttpMethod::Get).await?;
    let role = seed_role(&store, "operators").await?;
    store.grant(role, permission).await?;

    let deleted = store.delete_permission(permission).await;
    assert!(matches!(deleted, Err(AppError::Conflict(_))));

    let role_deleted = store.delete_role(role).await;
    assert!(matches!(role_deleted, Err(AppError::Conflict(_))));

    store.revoke(role, permission).await?;
    store.delete_permission(permission).await?;
    store.delete_role(role).await?;
    Ok(())
}

#[tokio::test]
async fn grouped_listing_is_sorted_and_annotated() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    let role = seed_role(&store, "operators").await?;
    let list_users = seed_permission(&store, "/users", HttpMethod::Get).await?;
    seed_permission(&store, "/devices", HttpMethod::Get).await?;
    seed_permission(&store, "/users/?", HttpMethod::Get).await?;
    store.grant(role, list_users).await?;

    let groups = store.grouped_for_role(role).await?;

    let entities: Vec<_> = groups.iter().map(|group| group.entity()).collect();
    assert_eq!(entities, vec!["devices", "users"]);

    let users_group = groups
        .iter()
        .find(|group| group.entity() == "users")
        .ok_or_else(|| AppError::NotFound("users group".to_owned()))?;
    let annotations: Vec<_> = users_group
        .permissions()
        .iter()
        .map(|member| (member.permission().url().to_owned(), member.is_granted()))
        .collect();
    assert_eq!(
        annotations,
        vec![("/users".to_owned(), true), ("/users/?".to_owned(), false)]
    );
    Ok(())
}

#[tokio::test]
async fn grouped_listing_for_unknown_role_is_empty() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    seed_permission(&store, "/users", HttpMethod::Get).await?;

    let groups = store.grouped_for_role(RoleId::from_i64(99)).await?;

    assert!(groups.is_empty());
    Ok(())
}

#[tokio::test]
async fn granting_an_unknown_permission_is_not_found() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    let role = seed_role(&store, "operators").await?;

    let granted = store.grant(role, PermissionId::from_i64(42)).await;

    assert!(matches!(granted, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn revoking_an_absent_grant_succeeds() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    let role = seed_role(&store, "operators").await?;
    let permission = seed_permission(&store, "/users", HttpMethod::Get).await?;

    store.revoke(role, permission).await?;
    store.revoke(role, permission).await?;
    Ok(())
}

#[tokio::test]
async fn role_names_stay_unique_across_updates() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    seed_role(&store, "operators").await?;
    let auditors = seed_role(&store, "auditors").await?;

    let renamed = store
        .update_role(
            auditors,
            UpdateRoleInput {
                name: "operators".to_owned(),
                description: String::new(),
            },
        )
        .await;

    assert!(matches!(renamed, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn assignment_round_trip() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    let role = seed_role(&store, "operators").await?;
    let user = store
        .create_user(CreateUserInput {
            username: "ada".to_owned(),
            email: Some("ada@example.com".to_owned()),
            enabled: true,
        })
        .await?;

    let assignment = store
        .assign_role(
            user.id(),
            AssignRoleInput {
                role_id: role,
                valid_from: None,
                valid_until: None,
            },
        )
        .await?;
    assert_eq!(assignment.role_name, "operators");

    let listed = store.list_role_assignments(user.id()).await?;
    assert_eq!(listed.len(), 1);

    store.unassign_role(user.id(), role).await?;
    let repeated = store.unassign_role(user.id(), role).await;
    assert!(matches!(repeated, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn deleting_a_user_discards_their_assignments() -> AppResult<()> {
    let store = InMemoryAccessStore::new();
    let role = seed_role(&store, "operators").await?;
    let user = store
        .create_user(CreateUserInput {
            username: "ada".to_owned(),
            email: None,
            enabled: true,
        })
        .await?;
    store
        .assign_role(
            user.id(),
            AssignRoleInput {
                role_id: role,
                valid_from: None,
                valid_until: None,
            },
        )
        .await?;

    store.delete_user(user.id()).await?;

    assert!(store.list_role_assignments(user.id()).await?.is_empty());
    store.delete_role(role).await?;
    Ok(())
}

#[tokio::test]
async fn matrix_round_trip_through_the_reconciler() -> AppResult<()> {
    let store = Arc::new(InMemoryAccessStore::new());
    let role = seed_role(store.as_ref(), "operators").await?;
    seed_permission(store.as_ref(), "/users", HttpMethod::Get).await?;
    seed_permission(store.as_ref(), "/users/?", HttpMethod::Get).await?;
    let create_users = seed_permission(store.as_ref(), "/users", HttpMethod::Post).await?;
    store
        .grant(role, PermissionId::from_i64(1))
        .await?;

    let reconciler = GrantReconciler::new(Arc::clone(&store) as Arc<dyn GrantStore>);
    let mut matrix = reconciler.load(role).await?;

    let row = matrix
        .row("users")
        .ok_or_else(|| AppError::NotFound("users row".to_owned()))?;
    assert!(row.flag(CrudIntent::List));
    assert!(!row.flag(CrudIntent::View));
    assert!(!row.flag(CrudIntent::Create));
    assert!(!row.flag(CrudIntent::Update));
    assert!(!row.flag(CrudIntent::Delete));

    let outcome = reconciler
        .toggle(&mut matrix, "users", CrudIntent::Create)
        .await?;
    assert!(matches!(
        outcome,
        ToggleOutcome::Applied {
            target: true,
            calls: 1
        }
    ));

    let reloaded = reconciler.load(role).await?;
    let row = reloaded
        .row("users")
        .ok_or_else(|| AppError::NotFound("users row".to_owned()))?;
    assert!(row.flag(CrudIntent::Create));
    assert!(!row.flag(CrudIntent::View));

    let granted: Vec<_> = reloaded
        .rows()
        .iter()
        .flat_map(|row| row.permissions())
        .filter(|member| member.is_granted())
        .map(|member| member.permission().id())
        .collect();
    assert_eq!(granted, vec![PermissionId::from_i64(1), create_users]);
    Ok(())
}
