//! Common test helpers and fixtures for server tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use taskboard_storage::*;
use taskboard_store_sqlite::SqliteStore;

use crate::auth::AuthUser;
use crate::server::AppServer;

/// Test invite code baked into workspaces created by `create_test_workspace`.
pub const TEST_INVITE_CODE: &str = "Ab3dE9";

pub async fn create_test_server() -> AppServer {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    AppServer::new_sqlite(store)
}

pub async fn create_test_user(server: &AppServer, email: &str) -> User {
    server
        .store
        .create_user(&CreateUserParams {
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password_hash: None,
            image: None,
        })
        .await
        .unwrap()
}

pub fn auth_as(user: &User) -> AuthUser {
    AuthUser(user.id.clone())
}

/// Create a workspace; the owner becomes its first ADMIN member.
pub async fn create_test_workspace(server: &AppServer, owner: &UserId, name: &str) -> Workspace {
    server
        .store
        .create_workspace(&CreateWorkspaceParams {
            name: name.to_string(),
            owner_user_id: owner.clone(),
            image: None,
            invite_code: TEST_INVITE_CODE.to_string(),
        })
        .await
        .unwrap()
}

pub async fn owner_member(server: &AppServer, workspace: &Workspace) -> Member {
    server
        .store
        .get_member_by_user(&workspace.id, &workspace.owner_user_id)
        .await
        .unwrap()
}

pub async fn add_test_member(
    server: &AppServer,
    workspace_id: &WorkspaceId,
    user_id: &UserId,
    role: MemberRole,
) -> Member {
    server
        .store
        .create_member(&CreateMemberParams {
            user_id: user_id.clone(),
            workspace_id: workspace_id.clone(),
            role,
        })
        .await
        .unwrap()
}

pub async fn create_test_project(
    server: &AppServer,
    workspace_id: &WorkspaceId,
    name: &str,
) -> Project {
    server
        .store
        .create_project(&CreateProjectParams {
            workspace_id: workspace_id.clone(),
            name: name.to_string(),
            image: None,
        })
        .await
        .unwrap()
}

/// Insert a task directly with an explicit position and status, due in a week.
pub async fn create_test_task(
    server: &AppServer,
    workspace_id: &WorkspaceId,
    project_id: &ProjectId,
    assignee_id: &MemberId,
    name: &str,
    status: TaskStatus,
    position: i64,
) -> Task {
    server
        .store
        .create_task(&CreateTaskParams {
            workspace_id: workspace_id.clone(),
            project_id: project_id.clone(),
            assignee_id: assignee_id.clone(),
            name: name.to_string(),
            description: None,
            status,
            position,
            due_date: Utc::now() + Duration::days(7),
        })
        .await
        .unwrap()
}
