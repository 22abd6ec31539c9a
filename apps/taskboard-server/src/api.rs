//! Wire types for the HTTP API.
//!
//! Storage records stay internal; everything that crosses the wire is
//! converted into these serde types. Ids travel as UUID strings, instants as
//! unix seconds, enums as their canonical uppercase names.

use serde::{Deserialize, Serialize};
use taskboard_storage::{Member, Project, Task, User, Workspace};

/// Standard response envelope: the affected record plus, for mutations, a
/// human-readable message.
#[derive(Debug, Serialize)]
pub struct Payload<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Payload<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }
}

// ───────────────────────────────────── Users ──────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<User> for ApiUser {
    fn from(user: User) -> Self {
        // password_hash stays behind the API boundary
        Self {
            id: user.id.0.to_string(),
            name: user.name,
            email: user.email,
            image: user.image,
            created_at: user.created_at.timestamp(),
            updated_at: user.updated_at.timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub image: Option<String>,
}

// ─────────────────────────────────── Workspaces ───────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiWorkspace {
    pub id: String,
    pub name: String,
    pub owner_user_id: String,
    pub image: Option<String>,
    pub invite_code: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Workspace> for ApiWorkspace {
    fn from(ws: Workspace) -> Self {
        Self {
            id: ws.id.0.to_string(),
            name: ws.name,
            owner_user_id: ws.owner_user_id.0.to_string(),
            image: ws.image,
            invite_code: ws.invite_code,
            created_at: ws.created_at.timestamp(),
            updated_at: ws.updated_at.timestamp(),
        }
    }
}

/// Lightweight workspace view for the pre-join invite flow.
#[derive(Debug, Serialize)]
pub struct WorkspaceInfo {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<Workspace> for WorkspaceInfo {
    fn from(ws: Workspace) -> Self {
        Self {
            id: ws.id.0.to_string(),
            name: ws.name,
            image: ws.image,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JoinWorkspaceRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceRef {
    pub id: String,
}

// ──────────────────────────────────── Members ─────────────────────────────────────

/// Member populated with the profile of the user behind it.
#[derive(Debug, Serialize)]
pub struct ApiMember {
    pub id: String,
    pub user_id: String,
    pub workspace_id: String,
    pub role: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ApiMember {
    pub fn populated(member: Member, user: Option<&User>) -> Self {
        Self {
            id: member.id.0.to_string(),
            user_id: member.user_id.0.to_string(),
            workspace_id: member.workspace_id.0.to_string(),
            role: member.role.as_str().to_string(),
            name: user.map(|u| u.name.clone()),
            email: user.map(|u| u.email.clone()),
            image: user.and_then(|u| u.image.clone()),
            created_at: member.created_at.timestamp(),
            updated_at: member.updated_at.timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct WorkspaceQuery {
    pub workspace_id: String,
}

#[derive(Debug, Serialize)]
pub struct MemberRef {
    pub id: String,
    pub workspace_id: String,
}

// ──────────────────────────────────── Projects ────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiProject {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Project> for ApiProject {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.0.to_string(),
            workspace_id: project.workspace_id.0.to_string(),
            name: project.name,
            image: project.image,
            created_at: project.created_at.timestamp(),
            updated_at: project.updated_at.timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub workspace_id: String,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

// ───────────────────────────────────── Tasks ──────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiTask {
    pub id: String,
    pub workspace_id: String,
    pub project_id: String,
    pub assignee_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub position: i64,
    pub due_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Task> for ApiTask {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.0.to_string(),
            workspace_id: task.workspace_id.0.to_string(),
            project_id: task.project_id.0.to_string(),
            assignee_id: task.assignee_id.map(|m| m.0.to_string()),
            name: task.name,
            description: task.description,
            status: task.status.as_str().to_string(),
            position: task.position,
            due_date: task.due_date.timestamp(),
            created_at: task.created_at.timestamp(),
            updated_at: task.updated_at.timestamp(),
        }
    }
}

/// Task with its project and assignee resolved for display.
#[derive(Debug, Serialize)]
pub struct PopulatedTask {
    #[serde(flatten)]
    pub task: ApiTask,
    pub project: Option<ApiProject>,
    pub assignee: Option<ApiMember>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub workspace_id: String,
    pub project_id: String,
    pub assignee_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<String>,
    pub assignee_id: Option<String>,
    pub due_date: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TaskMoveRequest {
    pub id: String,
    pub status: String,
    pub position: i64,
}

#[derive(Debug, Deserialize)]
pub struct MoveBoardRequest {
    pub task_updates: Vec<TaskMoveRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub workspace_id: String,
    pub project_id: Option<String>,
    pub assignee_id: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<i64>,
    pub search: Option<String>,
}

// ──────────────────────────────────── Reports ─────────────────────────────────────

/// Month-over-month task counts for a workspace or project. Each pair is
/// (count in the current calendar month, delta vs the previous month).
#[derive(Debug, Serialize)]
pub struct PerformanceCounts {
    pub task_count: i64,
    pub task_difference: i64,
    pub assigned_task_count: i64,
    pub assigned_task_difference: i64,
    pub completed_task_count: i64,
    pub completed_task_difference: i64,
    pub incompleted_task_count: i64,
    pub incompleted_task_difference: i64,
    pub overdue_task_count: i64,
    pub overdue_task_difference: i64,
}
