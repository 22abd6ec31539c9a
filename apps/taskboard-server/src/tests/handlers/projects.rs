//! Project handler tests.

use axum::extract::{Path, Query, State};
use axum::Json;
use taskboard_storage::{MemberRole, Store, StoreError, TaskStatus};

use super::super::common::*;
use crate::api::{CreateProjectRequest, UpdateProjectRequest, WorkspaceQuery};
use crate::error::ApiError;
use crate::handlers::projects::*;

#[tokio::test]
async fn any_member_can_create_projects() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;

    let payload = create_project(
        State(server.clone()),
        auth_as(&joiner),
        Json(CreateProjectRequest {
            workspace_id: workspace.id.0.to_string(),
            name: "backend".to_string(),
            image: None,
        }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(payload.data.name, "backend");
}

#[tokio::test]
async fn outsider_cannot_create_projects() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let outsider = create_test_user(&server, "outsider@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;

    let err = create_project(
        State(server.clone()),
        auth_as(&outsider),
        Json(CreateProjectRequest {
            workspace_id: workspace.id.0.to_string(),
            name: "backend".to_string(),
            image: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn list_projects_scoped_by_workspace() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let other = create_test_workspace(&server, &owner.id, "other").await;
    create_test_project(&server, &workspace.id, "backend").await;
    create_test_project(&server, &workspace.id, "frontend").await;
    create_test_project(&server, &other.id, "elsewhere").await;

    let payload = list_projects(
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
}

#[tokio::test]
async fn get_project_requires_membership() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let outsider = create_test_user(&server, "outsider@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let project = create_test_project(&server, &workspace.id, "backend").await;

    let err = get_project(
        State(server.clone()),
        auth_as(&outsider),
        Path(project.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn update_project_is_admin_gated() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let joiner = create_test_user(&server, "joiner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    add_test_member(&server, &workspace.id, &joiner.id, MemberRole::Member).await;
    let project = create_test_project(&server, &workspace.id, "backend").await;

    let err = update_project(
        State(server.clone()),
        auth_as(&joiner),
        Path(project.id.0.to_string()),
        Json(UpdateProjectRequest {
            name: Some("renamed".to_string()),
            image: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let payload = update_project(
        State(server.clone()),
        auth_as(&owner),
        Path(project.id.0.to_string()),
        Json(UpdateProjectRequest {
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
async fn delete_project_takes_tasks_with_it() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let member = owner_member(&server, &workspace).await;
    let project = create_test_project(&server, &workspace.id, "backend").await;
    let task = create_test_task(
        &server,
        &workspace.id,
        &project.id,
        &member.id,
        "task",
        TaskStatus::Todo,
        1000,
    )
    .await;

    delete_project(
        State(server.clone()),
        auth_as(&owner),
        Path(project.id.0.to_string()),
    )
    .await
    .unwrap();

    assert!(matches!(
        server.store.get_project(&project.id).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert!(matches!(
        server.store.get_task(&task.id).await.unwrap_err(),
        StoreError::NotFound
    ));
}
