//! Task types, the status enum, and board position constants.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{MemberId, ProjectId, TaskId, WorkspaceId};

/// Lowest position callers may assign when moving a task on the board.
pub const POSITION_MIN: i64 = 1_000;
/// Highest position callers may assign when moving a task on the board.
pub const POSITION_MAX: i64 = 1_000_000;
/// Gap left between consecutive positions on creation, so tasks can be
/// reinserted between neighbors without renumbering every row.
pub const POSITION_STEP: i64 = 1_000;

/// Task lifecycle status. Columns on the board, in workflow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

/// Error type for parsing TaskStatus from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTaskStatusError(pub String);

impl std::fmt::Display for ParseTaskStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid task status: {}", self.0)
    }
}

impl std::error::Error for ParseTaskStatusError {}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BACKLOG" => Ok(TaskStatus::Backlog),
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "IN_REVIEW" => Ok(TaskStatus::InReview),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "BACKLOG",
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::InReview => "IN_REVIEW",
            TaskStatus::Done => "DONE",
        }
    }
}

/// Task record.
///
/// `position` is the workspace-scoped sort key for manual board ordering;
/// ties are broken by creation order. `assignee_id` goes back to NULL when
/// the member it references is removed from the workspace.
#[derive(Clone, Debug)]
pub struct Task {
    pub id: TaskId,
    pub workspace_id: WorkspaceId,
    pub project_id: ProjectId,
    pub assignee_id: Option<MemberId>,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub position: i64,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a task. The caller computes `position`.
#[derive(Clone, Debug)]
pub struct CreateTaskParams {
    pub workspace_id: WorkspaceId,
    pub project_id: ProjectId,
    pub assignee_id: MemberId,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub position: i64,
    pub due_date: DateTime<Utc>,
}

/// Full replacement values for updating a task.
#[derive(Clone, Debug)]
pub struct TaskUpdate {
    pub project_id: ProjectId,
    pub assignee_id: Option<MemberId>,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
}

/// One entry of a board move batch: status and position applied verbatim.
#[derive(Clone, Debug)]
pub struct TaskMove {
    pub id: TaskId,
    pub status: TaskStatus,
    pub position: i64,
}

/// Filters for listing tasks within a workspace.
#[derive(Clone, Debug)]
pub struct TaskFilter {
    pub workspace_id: WorkspaceId,
    pub project_id: Option<ProjectId>,
    pub assignee_id: Option<MemberId>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn workspace(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            project_id: None,
            assignee_id: None,
            status: None,
            due_date: None,
            search: None,
        }
    }
}

/// Filters for counting tasks (performance reports).
#[derive(Clone, Debug, Default)]
pub struct TaskCountFilter {
    pub workspace_id: Option<WorkspaceId>,
    pub project_id: Option<ProjectId>,
    pub assignee_id: Option<MemberId>,
    pub status: Option<TaskStatus>,
    pub status_not: Option<TaskStatus>,
    pub due_before: Option<DateTime<Utc>>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}
