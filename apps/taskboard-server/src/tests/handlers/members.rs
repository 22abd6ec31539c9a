//! Member handler tests: listing and the role invariants.

use axum::extract::{Path, Query, State};
use axum::Json;
use taskboard_storage::{MemberRole, Store, StoreError};

use super::super::common::*;
use crate::api::{UpdateMemberRoleRequest, WorkspaceQuery};
use crate::error::ApiError;
use crate::handlers::members::*;

#[tokio::test]
async fn list_members_populates_user_details() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    let payload = list_members(
        State(server.clone()),
        auth_as(&owner),
        Query(WorkspaceQuery {
            workspace_id: workspace.id.0.to_string(),
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(payload.data.len(), 2);
    let joiner_entry = payload
        .data
        .iter()
        .find(|m| m.email.as_deref() == Some("joiner@example.com"))
        .unwrap();
    assert_eq!(joiner_entry.name.as_deref(), Some("joiner"));
    assert_eq!(joiner_entry.role, "MEMBER");
}

#[tokio::test]
async fn role_change_requires_admin_actor() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let joiner_member =
        add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    let err = update_member_role(
        State(server.clone()),
        auth_as(&joiner),
        Path(joiner_member.id.0.to_string()),
        Json(UpdateMemberRoleRequest {
            role: "ADMIN".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn demotion_blocked_while_single_admin() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let joiner_member =
        add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    // The check counts admins, not the target's role: even "demoting" a
    // plain member is refused while only one admin exists.
    let err = update_member_role(
        State(server.clone()),
        auth_as(&owner),
        Path(joiner_member.id.0.to_string()),
        Json(UpdateMemberRoleRequest {
            role: "MEMBER".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn demoting_one_of_two_admins_succeeds() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;
    let joiner_member =
        add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    // Promote the joiner, then demote the owner.
    update_member_role(
        State(server.clone()),
        auth_as(&owner),
        Path(joiner_member.id.0.to_string()),
        Json(UpdateMemberRoleRequest {
            role: "ADMIN".to_string(),
        }),
    )
    .await
    .unwrap();

    update_member_role(
        State(server.clone()),
        auth_as(&owner),
        Path(owner_m.id.0.to_string()),
        Json(UpdateMemberRoleRequest {
            role: "MEMBER".to_string(),
        }),
    )
    .await
    .unwrap();

    let demoted = server.store.get_member(&owner_m.id).await.unwrap();
    assert_eq!(demoted.role, MemberRole::Member);
    assert_eq!(server.store.count_admins(&workspace.id).await.unwrap(), 1);
}

#[tokio::test]
async fn role_change_rejected_in_single_member_workspace() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;

    // Requesting ADMIN skips the admin-count guard and trips the
    // single-member one.
    let err = update_member_role(
        State(server.clone()),
        auth_as(&owner),
        Path(owner_m.id.0.to_string()),
        Json(UpdateMemberRoleRequest {
            role: "ADMIN".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn unknown_role_is_validation_failure() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;

    let err = update_member_role(
        State(server.clone()),
        auth_as(&owner),
        Path(owner_m.id.0.to_string()),
        Json(UpdateMemberRoleRequest {
            role: "OWNER".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn removing_yourself_is_rejected() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;
    add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    let err = remove_member(
        State(server.clone()),
        auth_as(&owner),
        Path(owner_m.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn non_admin_cannot_remove_another_member() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let third = create_test_user(&server, "third@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;
    let third_member =
        add_test_member(&server, &workspace.id, &third.id, MemberRole::Member).await;

    let err = remove_member(
        State(server.clone()),
        auth_as(&joiner),
        Path(third_member.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn admin_removes_member_and_row_is_gone() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let joiner_member =
        add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    remove_member(
        State(server.clone()),
        auth_as(&owner),
        Path(joiner_member.id.0.to_string()),
    )
    .await
    .unwrap();

    assert!(matches!(
        server.store.get_member(&joiner_member.id).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert_eq!(server.store.count_members(&workspace.id).await.unwrap(), 1);
}

#[tokio::test]
async fn sole_member_cannot_be_removed() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;

    // The only member is necessarily the actor, so the self-removal guard
    // rejects it and the workspace keeps its last member.
    let err = remove_member(
        State(server.clone()),
        auth_as(&owner),
        Path(owner_m.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
    assert_eq!(server.store.count_members(&workspace.id).await.unwrap(), 1);
}

#[tokio::test]
async fn outsider_cannot_touch_members() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let outsider = create_test_user(&server, "outsider@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;

    let err = remove_member(
        State(server.clone()),
        auth_as(&outsider),
        Path(owner_m.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}
