//! Performance report tests with a pinned clock.

use axum::extract::{Path, State};
use chrono::{Duration, Local, Months, Utc};
use taskboard_storage::{CreateTaskParams, MemberRole, Store, TaskStatus};

use super::super::common::*;
use crate::error::ApiError;
use crate::handlers::reports::{compute, workspace_performance, ReportScope};

#[tokio::test]
async fn workspace_counts_cover_all_segments() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let helper = create_test_user(&server, "helper@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;
    let helper_m = add_test_member(&server, &workspace.id, &helper.id, MemberRole::Member).await;
    let project = create_test_project(&server, &workspace.id, "backend").await;

    let task = |assignee: &taskboard_storage::MemberId, status, due_days: i64| CreateTaskParams {
        workspace_id: workspace.id.clone(),
        project_id: project.id.clone(),
        assignee_id: assignee.clone(),
        name: "task".to_string(),
        description: None,
        status,
        position: 1000,
        due_date: Utc::now() + Duration::days(due_days),
    };

    // Mine, open, due next week.
    server
        .store
        .create_task(&task(&owner_m.id, TaskStatus::Todo, 7))
        .await
        .unwrap();
    // Mine, already done.
    server
        .store
        .create_task(&task(&owner_m.id, TaskStatus::Done, 7))
        .await
        .unwrap();
    // Someone else's, overdue.
    server
        .store
        .create_task(&task(&helper_m.id, TaskStatus::InProgress, -1))
        .await
        .unwrap();

    let counts = compute(
        &server,
        ReportScope::Workspace(workspace.id.clone()),
        &owner_m.id,
        Local::now(),
    )
    .await
    .unwrap();

    assert_eq!(counts.task_count, 3);
    assert_eq!(counts.task_difference, 3);
    assert_eq!(counts.assigned_task_count, 2);
    assert_eq!(counts.assigned_task_difference, 2);
    assert_eq!(counts.completed_task_count, 1);
    assert_eq!(counts.incompleted_task_count, 2);
    assert_eq!(counts.overdue_task_count, 1);
    assert_eq!(counts.overdue_task_difference, 1);
}

#[tokio::test]
async fn delta_goes_negative_when_last_month_was_busier() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;
    let project = create_test_project(&server, &workspace.id, "backend").await;

    for i in 0..3 {
        create_test_task(
            &server,
            &workspace.id,
            &project.id,
            &owner_m.id,
            &format!("task-{i}"),
            TaskStatus::Todo,
            1000 + i * 1000,
        )
        .await;
    }

    // Viewed from next month, everything created now falls in "last month".
    let next_month = Local::now().checked_add_months(Months::new(1)).unwrap();
    let counts = compute(
        &server,
        ReportScope::Workspace(workspace.id.clone()),
        &owner_m.id,
        next_month,
    )
    .await
    .unwrap();

    assert_eq!(counts.task_count, 0);
    assert_eq!(counts.task_difference, -3);
}

#[tokio::test]
async fn project_scope_ignores_sibling_projects() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;
    let owner_m = owner_member(&server, &workspace).await;
    let backend = create_test_project(&server, &workspace.id, "backend").await;
    let frontend = create_test_project(&server, &workspace.id, "frontend").await;

    create_test_task(
        &server,
        &workspace.id,
        &backend.id,
        &owner_m.id,
        "api",
        TaskStatus::Todo,
        1000,
    )
    .await;
    create_test_task(
        &server,
        &workspace.id,
        &frontend.id,
        &owner_m.id,
        "ui",
        TaskStatus::Todo,
        2000,
    )
    .await;

    let counts = compute(
        &server,
        ReportScope::Project(backend.id.clone()),
        &owner_m.id,
        Local::now(),
    )
    .await
    .unwrap();
    assert_eq!(counts.task_count, 1);
}

#[tokio::test]
async fn workspace_performance_requires_membership() {
    let server = create_test_server().await;
    let owner = create_test_user(&server, "owner@example.com").await;
    let outsider = create_test_user(&server, "outsider@example.com").await;
    let workspace = create_test_workspace(&server, &owner.id, "acme").await;

    let err = workspace_performance(
        State(server.clone()),
        auth_as(&outsider),
        Path(workspace.id.0.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let payload = workspace_performance(
        State(server.clone()),
        auth_as(&owner),
        Path(workspace.id.0.to_string()),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(payload.data.task_count, 0);
}
