//! Reconciliation between a role's grant set and its on-screen CRUD matrix.
//!
//! The matrix presents one row per entity with five togglable flags. A flag
//! flip fans out into one grant or revoke call per affected catalog
//! permission; the calls run concurrently and are awaited jointly. Displayed
//! state is updated optimistically and restored in full if any call in the
//! batch fails, so the screen never shows a half-applied toggle even though
//! the backend calls are not transactional. A follow-up load is the only way
//! to observe what a partially-applied batch left behind.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use clavis_core::{AppError, AppResult};
use clavis_domain::{CrudIntent, GrantedPermission, PermissionGroup, RoleId};

use crate::access_ports::GrantStore;

/// Lifecycle of one displayed bucket flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagState {
    /// The flag reflects the last confirmed backend state.
    Settled(bool),
    /// A toggle batch is in flight. `original` is the value restored if the
    /// batch fails.
    Pending {
        /// Value the batch is driving towards.
        target: bool,
        /// Pre-toggle value.
        original: bool,
    },
}

impl FlagState {
    /// Returns the value the display shows right now.
    #[must_use]
    pub fn effective(&self) -> bool {
        match self {
            Self::Settled(value) => *value,
            Self::Pending { target, .. } => *target,
        }
    }

    /// Returns whether a batch for this flag is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// One entity row of the matrix: the entity's annotated permissions plus the
/// five derived bucket flags.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    group: PermissionGroup,
    flags: HashMap<CrudIntent, FlagState>,
}

impl MatrixRow {
    fn from_group(group: PermissionGroup) -> Self {
        let flags = CrudIntent::all()
            .iter()
            .map(|intent| (*intent, FlagState::Settled(group.is_bucket_granted(*intent))))
            .collect();

        Self { group, flags }
    }

    /// Returns the entity (resource family) name.
    #[must_use]
    pub fn entity(&self) -> &str {
        self.group.entity()
    }

    /// Returns the entity's annotated permissions.
    #[must_use]
    pub fn permissions(&self) -> &[GrantedPermission] {
        self.group.permissions()
    }

    /// Returns the displayed value of one bucket flag.
    #[must_use]
    pub fn flag(&self, intent: CrudIntent) -> bool {
        self.flag_state(intent).effective()
    }

    /// Returns the full state of one bucket flag.
    #[must_use]
    pub fn flag_state(&self, intent: CrudIntent) -> FlagState {
        self.flags
            .get(&intent)
            .copied()
            .unwrap_or(FlagState::Settled(false))
    }

    /// Returns the permissions no bucket claims (unknown HTTP verbs).
    #[must_use]
    pub fn unclassified_permissions(&self) -> Vec<&GrantedPermission> {
        self.group.unclassified_permissions()
    }

    /// Positions of the permissions that classify into `intent`.
    fn affected_positions(&self, intent: CrudIntent) -> Vec<usize> {
        self.group
            .permissions()
            .iter()
            .enumerate()
            .filter(|(_, permission)| permission.intent() == Some(intent))
            .map(|(position, _)| position)
            .collect()
    }

    /// Applies the optimistic half of a toggle and returns the annotation
    /// snapshot needed to undo it.
    fn begin_toggle(&mut self, intent: CrudIntent, target: bool) -> Vec<(usize, bool)> {
        let original = self.flag(intent);
        self.flags
            .insert(intent, FlagState::Pending { target, original });

        let positions = self.affected_positions(intent);
        let permissions = self.group.permissions_mut();

        let mut snapshot = Vec::with_capacity(positions.len());
        for position in positions {
            snapshot.push((position, permissions[position].is_granted()));
            permissions[position].set_granted(target);
        }

        snapshot
    }

    /// Confirms the pending flag value after a fully successful batch.
    fn settle(&mut self, intent: CrudIntent) {
        let settled = FlagState::Settled(self.flag(intent));
        self.flags.insert(intent, settled);
    }

    /// Restores the pre-toggle flag value and permission annotations.
    fn roll_back(&mut self, intent: CrudIntent, snapshot: &[(usize, bool)]) {
        if let FlagState::Pending { original, .. } = self.flag_state(intent) {
            self.flags.insert(intent, FlagState::Settled(original));
        }

        let permissions = self.group.permissions_mut();
        for (position, granted) in snapshot {
            permissions[*position].set_granted(*granted);
        }
    }
}

/// The loaded CRUD matrix of one role editing session.
///
/// Owned exclusively by the session that loaded it; toggles require `&mut`
/// access, so two toggles can never interleave on the same matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionMatrix {
    role_id: RoleId,
    rows: Vec<MatrixRow>,
}

impl PermissionMatrix {
    fn from_groups(role_id: RoleId, groups: Vec<PermissionGroup>) -> Self {
        Self {
            role_id,
            rows: groups.into_iter().map(MatrixRow::from_group).collect(),
        }
    }

    /// Returns the role this matrix was loaded for.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the entity rows in the order the grant store reported them.
    #[must_use]
    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    /// Returns whether the grant store reported no permissions for the role.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up one entity row by name.
    #[must_use]
    pub fn row(&self, entity: &str) -> Option<&MatrixRow> {
        self.rows.iter().find(|row| row.entity() == entity)
    }

    fn row_mut(&mut self, entity: &str) -> Option<&mut MatrixRow> {
        self.rows.iter_mut().find(|row| row.entity() == entity)
    }
}

/// Result of a committed toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// No permission classifies into the bucket; nothing was sent.
    NoOp,
    /// Every call in the batch succeeded.
    Applied {
        /// Value the flag now holds.
        target: bool,
        /// Number of grant or revoke calls issued.
        calls: usize,
    },
}

/// Orchestrates loading a role's grant matrix and committing flag toggles.
#[derive(Clone)]
pub struct GrantReconciler {
    grant_store: Arc<dyn GrantStore>,
    batch_timeout: Option<Duration>,
}

impl GrantReconciler {
    /// Creates a reconciler without a batch deadline.
    #[must_use]
    pub fn new(grant_store: Arc<dyn GrantStore>) -> Self {
        Self {
            grant_store,
            batch_timeout: None,
        }
    }

    /// Creates a reconciler that treats a toggle batch as failed when it does
    /// not settle within `batch_timeout`.
    #[must_use]
    pub fn with_batch_timeout(grant_store: Arc<dyn GrantStore>, batch_timeout: Duration) -> Self {
        Self {
            grant_store,
            batch_timeout: Some(batch_timeout),
        }
    }

    /// Loads the CRUD matrix for one role.
    ///
    /// Unknown roles produce an empty matrix rather than an error; the
    /// display layer renders that as "no permissions found".
    pub async fn load(&self, role_id: RoleId) -> AppResult<PermissionMatrix> {
        let groups = self.grant_store.grouped_for_role(role_id).await?;
        Ok(PermissionMatrix::from_groups(role_id, groups))
    }

    /// Flips one bucket flag and commits the change to the grant store.
    ///
    /// The target value is the negation of the flag's current value. Every
    /// permission classified into the bucket is granted or revoked with one
    /// concurrent call each. On any failure the displayed state is restored
    /// in full and the first error is returned; the caller decides whether to
    /// re-attempt or re-load.
    pub async fn toggle(
        &self,
        matrix: &mut PermissionMatrix,
        entity: &str,
        intent: CrudIntent,
    ) -> AppResult<ToggleOutcome> {
        let role_id = matrix.role_id();
        let Some(row) = matrix.row_mut(entity) else {
            return Err(AppError::NotFound(format!(
                "entity '{entity}' is not part of the loaded matrix"
            )));
        };

        let affected = row.affected_positions(intent);
        if affected.is_empty() {
            return Ok(ToggleOutcome::NoOp);
        }

        let target = !row.flag(intent);
        let snapshot = row.begin_toggle(intent, target);

        let permission_ids: Vec<_> = affected
            .iter()
            .map(|position| row.permissions()[*position].permission().id())
            .collect();

        let calls = permission_ids.iter().copied().map(|permission_id| {
            let store = Arc::clone(&self.grant_store);
            async move {
                if target {
                    store.grant(role_id, permission_id).await
                } else {
                    store.revoke(role_id, permission_id).await
                }
            }
        });

        let results = match self.batch_timeout {
            Some(limit) => match tokio::time::timeout(limit, join_all(calls)).await {
                Ok(results) => results,
                Err(_) => {
                    row.roll_back(intent, &snapshot);
                    return Err(AppError::Internal(format!(
                        "grant batch for entity '{entity}' did not settle within {}ms",
                        limit.as_millis()
                    )));
                }
            },
            None => join_all(calls).await,
        };

        match results.into_iter().find_map(Result::err) {
            None => {
                row.settle(intent);
                Ok(ToggleOutcome::Applied {
                    target,
                    calls: permission_ids.len(),
                })
            }
            Some(first_error) => {
                row.roll_back(intent, &snapshot);
                Err(first_error)
            }
        }
    }
}
