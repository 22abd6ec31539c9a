//! Workspace handler tests.

use axum::extract::{Path, State};
use axum::Json;
use taskboard_storage::{MemberRole, Store, StoreError};
use uuid::Uuid;

use super::super::common::*;
use crate::api::{CreateWorkspaceRequest, JoinWorkspaceRequest, UpdateWorkspaceRequest};
use crate::error::ApiError;
use crate::handlers::workspaces::*;

#[tokio::test]
async fn create_workspace_makes_owner_admin() {
    let server = create_test_server().await;
    let user = create_test_user(&server, "owner@example.com").await;

    let payload = create_workspace(
        State(server.clone()),
        auth_as(&user),
        Json(CreateWorkspaceRequest {
            name: "acme".to_string(),
            image: None,
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(payload.data.name, "acme");
    assert_eq!(payload.data.invite_code.len(), INVITE_CODE_LENGTH);

    let workspace_id = taskboard_storage::WorkspaceId(Uuid::parse_str(&payload.data.id).unwrap());
    assert_eq!(server.store.count_members(&workspace_id).await.unwrap(), 1);
    assert_eq!(server.store.count_admins(&workspace_id).await.unwrap(), 1);
}

#[tokio::test]
async fn create_workspace_rejects_blank_name() {
    let server = create_test_server().await;
    let user = create_test_user(&server, "owner@example.com").await;

    let err = create_workspace(
        State(server.clone()),
        auth_as(&user),
        Json(CreateWorkspaceRequest {
            name: "   ".to_string(),
            image: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn list_workspaces_returns_only_memberships() {
    let server = create_test_server().await;
    let alice = create_test_user(&server, "alice@example.com").await;
    let bob = create_test_user(&server, "bob@example.com").await;
    create_test_workspace(&server, &alice.id, "alice-ws").await;
    create_test_workspace(&server, &bob.id, "bob-ws").await;

    let payload = list_workspaces(State(server.clone()), auth_as(&alice))
        .await
        .unwrap()
        .0;
    assert_eq!(payload.data.len(), 1);
    assert_eq!(payload.data[0].name, "alice-ws");
}

#[tokio::test]
async fn get_workspace_requires_membership() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let outsider = create_test_user(&server, "outsider@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;

    let err = get_workspace(
        State(server.clone()),
        auth_as(&outsider),
        Path(workspace.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn workspace_info_needs_no_membership() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let outsider = create_test_user(&server, "outsider@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;

    let payload = get_workspace_info(
        State(server.clone()),
        auth_as(&outsider),
        Path(workspace.id.0.to_string()),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(payload.data.name, "acme");
}

#[tokio::test]
async fn update_workspace_requires_admin() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    let err = update_workspace(
        State(server.clone()),
        auth_as(&joiner),
        Path(workspace.id.0.to_string()),
        Json(UpdateWorkspaceRequest {
            name: Some("renamed".to_string()),
            image: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let payload = update_workspace(
        State(server.clone()),
        auth_as(&owner),
        Path(workspace.id.0.to_string()),
        Json(UpdateWorkspaceRequest {
            name: Some("renamed".to_string()),
            image: None,
        }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(payload.data.name, "renamed");
}

#[tokio::test]
async fn delete_workspace_cascades_members() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let member = owner_member(&server, &workspace).await;

    delete_workspace(
        State(server.clone()),
        auth_as(&owner),
        Path(workspace.id.0.to_string()),
    )
    .await
    .unwrap();

    assert!(matches!(
        server.store.get_workspace(&workspace.id).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert!(matches!(
        server.store.get_member(&member.id).await.unwrap_err(),
        StoreError::NotFound
    ));
}

#[tokio::test]
async fn reset_invite_code_rotates_token() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    let err = reset_invite_code(
        State(server.clone()),
        auth_as(&joiner),
        Path(workspace.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let payload = reset_invite_code(
        State(server.clone()),
        auth_as(&owner),
        Path(workspace.id.0.to_string()),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(payload.data.invite_code.len(), INVITE_CODE_LENGTH);
    assert_ne!(payload.data.invite_code, TEST_INVITE_CODE);
}

#[tokio::test]
async fn join_with_valid_code_creates_member() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;

    join_workspace(
        State(server.clone()),
        auth_as(&joiner),
        Path(workspace.id.0.to_string()),
        Json(JoinWorkspaceRequest {
            code: TEST_INVITE_CODE.to_string(),
        }),
    )
    .await
    .unwrap();

    let member = server
        .store
        .get_member_by_user(&workspace.id, &joiner.id)
        .await
        .unwrap();
    assert_eq!(member.role, MemberRole::Member);
}

#[tokio::test]
async fn join_with_wrong_code_creates_nothing() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;

    let err = join_workspace(
        State(server.clone()),
        auth_as(&joiner),
        Path(workspace.id.0.to_string()),
        Json(JoinWorkspaceRequest {
            code: "Xx9zZ1".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));

    assert!(matches!(
        server
            .store
            .get_member_by_user(&workspace.id, &joiner.id)
            .await
            .unwrap_err(),
        StoreError::NotFound
    ));
}

#[tokio::test]
async fn join_with_short_code_is_validation_failure() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;

    let err = join_workspace(
        State(server.clone()),
        auth_as(&joiner),
        Path(workspace.id.0.to_string()),
        Json(JoinWorkspaceRequest {
            code: "abc".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn join_twice_is_rejected() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    let err = join_workspace(
        State(server.clone()),
        auth_as(&joiner),
        Path(workspace.id.0.to_string()),
        Json(JoinWorkspaceRequest {
            code: TEST_INVITE_CODE.to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn join_unknown_workspace_is_not_found() {
    let server = create_test_server().await;
    let joiner = create_test_user(&server, "joiner@example.com").await;

    let err = join_workspace(
        State(server.clone()),
        auth_as(&joiner),
        Path(Uuid::now_v7().to_string()),
        Json(JoinWorkspaceRequest {
            code: TEST_INVITE_CODE.to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn invite_codes_are_alphanumeric() {
    let code = generate_invite_code(INVITE_CODE_LENGTH);
    assert_eq!(code.len(), INVITE_CODE_LENGTH);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
}
