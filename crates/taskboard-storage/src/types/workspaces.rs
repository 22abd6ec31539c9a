//! Workspace types.

use chrono::{DateTime, Utc};

use super::{UserId, WorkspaceId};

/// Workspace record.
#[derive(Clone, Debug)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub owner_user_id: UserId,
    pub image: Option<String>,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a workspace.
///
/// The creator becomes the workspace's first ADMIN member; backends insert
/// the workspace row and that member row in one transaction.
#[derive(Clone, Debug)]
pub struct CreateWorkspaceParams {
    pub name: String,
    pub owner_user_id: UserId,
    pub image: Option<String>,
    pub invite_code: String,
}
