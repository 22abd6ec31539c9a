//! Shared server state and the workspace authorization guard.

use std::sync::Arc;

use taskboard_storage::{Member, Store, StoreError, UserId, WorkspaceId};
use taskboard_store_postgres::PostgresStore;
use taskboard_store_sqlite::SqliteStore;

use crate::backend::StoreBackend;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppServer {
    pub store: StoreBackend,
}

impl AppServer {
    pub fn new_sqlite(store: Arc<SqliteStore>) -> Self {
        Self {
            store: StoreBackend::Sqlite(store),
        }
    }

    pub fn new_postgres(store: Arc<PostgresStore>) -> Self {
        Self {
            store: StoreBackend::Postgres(store),
        }
    }

    /// Resolve the caller's membership in a workspace.
    ///
    /// Every workspace-scoped operation goes through this check first; a
    /// principal without a membership row gets a 403, never a peek at
    /// whether the workspace exists.
    pub async fn require_member(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Member, ApiError> {
        self.store
            .get_member_by_user(workspace_id, user_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    ApiError::forbidden("No member found in this workspace")
                }
                other => ApiError::internal(format!("Failed to resolve membership: {other}")),
            })
    }

    /// Resolve the caller's membership and require the ADMIN role.
    pub async fn require_admin(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Member, ApiError> {
        let member = self.require_member(workspace_id, user_id).await?;
        if !member.role.is_admin() {
            return Err(ApiError::forbidden("You do not have permission"));
        }
        Ok(member)
    }
}
