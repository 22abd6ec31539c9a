//! Task handlers: create, list, get, update, delete, and the board move batch.
//!
//! Board ordering: `position` is a workspace-scoped sort key. Creation
//! appends at `max(position) + 1000` (1000 for the first task), leaving gaps
//! for reinsertion. The read-max-then-insert is not atomic against
//! concurrent creators; duplicate positions are tolerated and resolved by
//! the display tie-break on creation order.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use taskboard_storage::{
    CreateTaskParams, Member, MemberId, Project, ProjectId, Store, StoreError, Task, TaskFilter,
    TaskId, TaskMove, TaskStatus, TaskUpdate, User, WorkspaceId, POSITION_MAX, POSITION_MIN,
    POSITION_STEP,
};

use crate::api::{
    ApiMember, ApiTask, CreateTaskRequest, ListTasksQuery, MoveBoardRequest, Payload,
    PopulatedTask, UpdateTaskRequest,
};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{parse_id, parse_instant, require_name};
use crate::server::AppServer;

fn parse_status(value: &str) -> Result<TaskStatus, ApiError> {
    value.parse().map_err(|_| ApiError::invalid("Invalid status"))
}

/// The assignee must be a member of the task's workspace.
async fn resolve_assignee(
    server: &AppServer,
    workspace_id: &WorkspaceId,
    assignee_id: &MemberId,
) -> Result<Member, ApiError> {
    let member = server
        .store
        .get_member(assignee_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => {
                ApiError::invalid("Assignee is not a member of this workspace")
            }
            other => ApiError::internal(format!("Failed to get assignee: {other}")),
        })?;
    if member.workspace_id != *workspace_id {
        return Err(ApiError::invalid(
            "Assignee is not a member of this workspace",
        ));
    }
    Ok(member)
}

fn populate(task: Task, projects: &[Project], members: &[Member], users: &[User]) -> PopulatedTask {
    let project = projects
        .iter()
        .find(|p| p.id == task.project_id)
        .cloned()
        .map(Into::into);
    let assignee = task.assignee_id.as_ref().and_then(|assignee_id| {
        members.iter().find(|m| &m.id == assignee_id).map(|member| {
            let user = users.iter().find(|u| u.id == member.user_id);
            ApiMember::populated(member.clone(), user)
        })
    });
    PopulatedTask {
        task: task.into(),
        project,
        assignee,
    }
}

async fn populate_all(
    server: &AppServer,
    tasks: Vec<Task>,
) -> Result<Vec<PopulatedTask>, ApiError> {
    let project_ids: Vec<_> = tasks.iter().map(|t| t.project_id.clone()).collect();
    let assignee_ids: Vec<_> = tasks
        .iter()
        .filter_map(|t| t.assignee_id.clone())
        .collect();

    let projects = server
        .store
        .list_projects_by_ids(&project_ids)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list projects: {e}")))?;
    let members = server
        .store
        .list_members_by_ids(&assignee_ids)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list members: {e}")))?;
    let user_ids: Vec<_> = members.iter().map(|m| m.user_id.clone()).collect();
    let users = server
        .store
        .list_users_by_ids(&user_ids)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list users: {e}")))?;

    Ok(tasks
        .into_iter()
        .map(|task| populate(task, &projects, &members, &users))
        .collect())
}

pub async fn list_tasks(
    State(server): State<AppServer>,
    auth: AuthUser,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Payload<Vec<PopulatedTask>>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&query.workspace_id, "workspace")?);
    server.require_member(&workspace_id, &auth.0).await?;

    let mut filter = TaskFilter::workspace(workspace_id);
    if let Some(project_id) = &query.project_id {
        filter.project_id = Some(ProjectId(parse_id(project_id, "project")?));
    }
    if let Some(assignee_id) = &query.assignee_id {
        filter.assignee_id = Some(MemberId(parse_id(assignee_id, "assignee")?));
    }
    if let Some(status) = &query.status {
        filter.status = Some(parse_status(status)?);
    }
    if let Some(due_date) = query.due_date {
        filter.due_date = Some(parse_instant(due_date, "due date")?);
    }
    filter.search = query.search.clone();

    let tasks = server
        .store
        .list_tasks(&filter)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list tasks: {e}")))?;

    let populated = populate_all(&server, tasks).await?;
    Ok(Json(Payload::new(populated)))
}

pub async fn get_task(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(task_id): Path<String>,
) -> Result<Json<Payload<PopulatedTask>>, ApiError> {
    let task_id = TaskId(parse_id(&task_id, "task")?);

    let task = server.store.get_task(&task_id).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::not_found("Task not found"),
        other => ApiError::internal(format!("Failed to get task: {other}")),
    })?;

    server.require_member(&task.workspace_id, &auth.0).await?;

    let mut populated = populate_all(&server, vec![task]).await?;
    let task = match populated.pop() {
        Some(task) => task,
        None => return Err(ApiError::not_found("Task not found")),
    };
    Ok(Json(Payload::new(task)))
}

pub async fn create_task(
    State(server): State<AppServer>,
    auth: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<Payload<ApiTask>>, ApiError> {
    let name = require_name(&req.name)?;
    let workspace_id = WorkspaceId(parse_id(&req.workspace_id, "workspace")?);
    let project_id = ProjectId(parse_id(&req.project_id, "project")?);
    let assignee_id = MemberId(parse_id(&req.assignee_id, "assignee")?);
    let status = parse_status(&req.status)?;
    let due_date = parse_instant(req.due_date, "due date")?;

    server.require_member(&workspace_id, &auth.0).await?;
    resolve_assignee(&server, &workspace_id, &assignee_id).await?;

    // Append after the workspace's highest position, leaving a gap.
    let position = server
        .store
        .max_task_position(&workspace_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read board position: {e}")))?
        .map(|max| max + POSITION_STEP)
        .unwrap_or(POSITION_STEP);

    let task = server
        .store
        .create_task(&CreateTaskParams {
            workspace_id,
            project_id,
            assignee_id,
            name,
            description: req.description,
            status,
            position,
            due_date,
        })
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create task: {e}")))?;

    Ok(Json(Payload::with_message(
        task.into(),
        "Task has been created",
    )))
}

pub async fn update_task(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(task_id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Payload<ApiTask>>, ApiError> {
    let task_id = TaskId(parse_id(&task_id, "task")?);

    let existing = server.store.get_task(&task_id).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::not_found("Task not found"),
        other => ApiError::internal(format!("Failed to get task: {other}")),
    })?;

    server.require_member(&existing.workspace_id, &auth.0).await?;

    let name = match req.name {
        Some(name) => require_name(&name)?,
        None => existing.name.clone(),
    };
    let status = match req.status {
        Some(status) => parse_status(&status)?,
        None => existing.status,
    };
    let project_id = match req.project_id {
        Some(project_id) => ProjectId(parse_id(&project_id, "project")?),
        None => existing.project_id.clone(),
    };
    let assignee_id = match req.assignee_id {
        Some(assignee_id) => {
            let assignee_id = MemberId(parse_id(&assignee_id, "assignee")?);
            resolve_assignee(&server, &existing.workspace_id, &assignee_id).await?;
            Some(assignee_id)
        }
        None => existing.assignee_id.clone(),
    };
    let due_date = match req.due_date {
        Some(due_date) => parse_instant(due_date, "due date")?,
        None => existing.due_date,
    };
    let description = req.description.or(existing.description);

    server
        .store
        .update_task(
            &task_id,
            &TaskUpdate {
                project_id,
                assignee_id,
                name,
                description,
                status,
                due_date,
            },
        )
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Task not found"),
            other => ApiError::internal(format!("Failed to update task: {other}")),
        })?;

    let task = server
        .store
        .get_task(&task_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get task: {e}")))?;

    Ok(Json(Payload::with_message(
        task.into(),
        "Task has been updated",
    )))
}

/// Drag-and-drop board reorder: a batch of (task, status, position) updates
/// applied verbatim in one transaction. The batch must be non-empty, every
/// position in bounds, and every task in one workspace; otherwise nothing
/// moves.
pub async fn move_board(
    State(server): State<AppServer>,
    auth: AuthUser,
    Json(req): Json<MoveBoardRequest>,
) -> Result<Json<Payload<Vec<ApiTask>>>, ApiError> {
    if req.task_updates.is_empty() {
        return Err(ApiError::invalid("No task updates provided"));
    }

    let mut moves = Vec::with_capacity(req.task_updates.len());
    for update in &req.task_updates {
        if update.position < POSITION_MIN || update.position > POSITION_MAX {
            return Err(ApiError::invalid(format!(
                "Position must be between {POSITION_MIN} and {POSITION_MAX}"
            )));
        }
        moves.push(TaskMove {
            id: TaskId(parse_id(&update.id, "task")?),
            status: parse_status(&update.status)?,
            position: update.position,
        });
    }

    let ids: Vec<_> = moves.iter().map(|m| m.id.clone()).collect();
    let tasks = server
        .store
        .list_tasks_by_ids(&ids)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to resolve tasks: {e}")))?;

    let unique_ids: HashSet<_> = ids.iter().collect();
    if tasks.len() != unique_ids.len() {
        return Err(ApiError::not_found("Task not found"));
    }

    let workspace_ids: HashSet<_> = tasks.iter().map(|t| t.workspace_id.clone()).collect();
    if workspace_ids.len() != 1 {
        return Err(ApiError::invalid(
            "All tasks must belong to the same workspace",
        ));
    }
    let workspace_id = match workspace_ids.into_iter().next() {
        Some(workspace_id) => workspace_id,
        None => return Err(ApiError::invalid("No task updates provided")),
    };

    server.require_member(&workspace_id, &auth.0).await?;

    server
        .store
        .move_tasks(&moves)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Task not found"),
            other => ApiError::internal(format!("Failed to move tasks: {other}")),
        })?;

    let updated = server
        .store
        .list_tasks_by_ids(&ids)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to resolve tasks: {e}")))?
        .into_iter()
        .map(ApiTask::from)
        .collect();

    Ok(Json(Payload::with_message(updated, "Board has been updated")))
}

pub async fn delete_task(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(task_id): Path<String>,
) -> Result<Json<Payload<ApiTask>>, ApiError> {
    let task_id = TaskId(parse_id(&task_id, "task")?);

    let existing = server.store.get_task(&task_id).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::not_found("Task not found"),
        other => ApiError::internal(format!("Failed to get task: {other}")),
    })?;

    server.require_member(&existing.workspace_id, &auth.0).await?;

    server
        .store
        .delete_task(&task_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Task not found"),
            other => ApiError::internal(format!("Failed to delete task: {other}")),
        })?;

    Ok(Json(Payload::with_message(
        existing.into(),
        "Task has been deleted",
    )))
}
