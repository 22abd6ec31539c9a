//! The Store trait that backends implement.

use crate::types::*;
use crate::StoreError;

/// The storage trait the server depends on.
///
/// All methods that act on members/projects/tasks are **scoped by
/// workspace** through the ids they take; backends enforce cascade deletes
/// from workspace to its children and nullify task assignees when the
/// member they point at is removed.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Users ──────────────────────────────────────

    /// Create a new user (returns the full record).
    async fn create_user(&self, params: &CreateUserParams) -> Result<User, StoreError>;

    /// Get user by ID.
    async fn get_user(&self, user_id: &UserId) -> Result<User, StoreError>;

    /// Get user by email.
    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Fetch users by id, in no particular order.
    async fn list_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError>;

    /// Update a user's profile fields.
    async fn update_user(
        &self,
        user_id: &UserId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError>;

    /// Delete a user (cascades to memberships and owned workspaces).
    async fn delete_user(&self, user_id: &UserId) -> Result<(), StoreError>;

    // ─────────────────────────────────── Workspaces ───────────────────────────────────

    /// Create a workspace and its first ADMIN member in one transaction.
    async fn create_workspace(&self, params: &CreateWorkspaceParams)
        -> Result<Workspace, StoreError>;

    /// Get workspace by ID.
    async fn get_workspace(&self, workspace_id: &WorkspaceId) -> Result<Workspace, StoreError>;

    /// List the workspaces a user is a member of, newest first.
    async fn list_workspaces_for_user(&self, user_id: &UserId)
        -> Result<Vec<Workspace>, StoreError>;

    /// Update workspace name/image.
    async fn update_workspace(
        &self,
        workspace_id: &WorkspaceId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError>;

    /// Replace the workspace invite code.
    async fn set_invite_code(&self, workspace_id: &WorkspaceId, code: &str)
        -> Result<(), StoreError>;

    /// Delete a workspace (cascades to members, projects, and tasks).
    async fn delete_workspace(&self, workspace_id: &WorkspaceId) -> Result<(), StoreError>;

    // ──────────────────────────────────── Members ─────────────────────────────────────

    /// Add a user to a workspace. A duplicate (user, workspace) pair is
    /// `AlreadyExists`.
    async fn create_member(&self, params: &CreateMemberParams) -> Result<Member, StoreError>;

    /// Get member by ID.
    async fn get_member(&self, member_id: &MemberId) -> Result<Member, StoreError>;

    /// Resolve a user's membership in a workspace, if any.
    async fn get_member_by_user(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Member, StoreError>;

    /// List all members of a workspace, oldest first.
    async fn list_members(&self, workspace_id: &WorkspaceId) -> Result<Vec<Member>, StoreError>;

    /// Fetch members by id, in no particular order.
    async fn list_members_by_ids(&self, ids: &[MemberId]) -> Result<Vec<Member>, StoreError>;

    /// Count all members of a workspace.
    async fn count_members(&self, workspace_id: &WorkspaceId) -> Result<i64, StoreError>;

    /// Count ADMIN members of a workspace.
    async fn count_admins(&self, workspace_id: &WorkspaceId) -> Result<i64, StoreError>;

    /// Change a member's role.
    async fn update_member_role(
        &self,
        member_id: &MemberId,
        role: MemberRole,
    ) -> Result<(), StoreError>;

    /// Remove a member (task assignments pointing at them become NULL).
    async fn delete_member(&self, member_id: &MemberId) -> Result<(), StoreError>;

    // ──────────────────────────────────── Projects ────────────────────────────────────

    /// Create a project within a workspace.
    async fn create_project(&self, params: &CreateProjectParams) -> Result<Project, StoreError>;

    /// Get project by ID.
    async fn get_project(&self, project_id: &ProjectId) -> Result<Project, StoreError>;

    /// List all projects in a workspace, newest first.
    async fn list_projects(&self, workspace_id: &WorkspaceId) -> Result<Vec<Project>, StoreError>;

    /// Fetch projects by id, in no particular order.
    async fn list_projects_by_ids(&self, ids: &[ProjectId]) -> Result<Vec<Project>, StoreError>;

    /// Update project name/image.
    async fn update_project(
        &self,
        project_id: &ProjectId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError>;

    /// Delete a project (and all its tasks).
    async fn delete_project(&self, project_id: &ProjectId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Tasks ──────────────────────────────────────

    /// Create a task. The caller supplies the board position.
    async fn create_task(&self, params: &CreateTaskParams) -> Result<Task, StoreError>;

    /// Get task by ID.
    async fn get_task(&self, task_id: &TaskId) -> Result<Task, StoreError>;

    /// List tasks matching the filter, newest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;

    /// Fetch tasks by id, in no particular order.
    async fn list_tasks_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, StoreError>;

    /// Highest board position currently used in a workspace, if any task exists.
    async fn max_task_position(&self, workspace_id: &WorkspaceId)
        -> Result<Option<i64>, StoreError>;

    /// Replace a task's mutable fields.
    async fn update_task(&self, task_id: &TaskId, update: &TaskUpdate) -> Result<(), StoreError>;

    /// Apply a board move batch in a single transaction: every entry's
    /// status and position are written verbatim, and a missing task id
    /// aborts the whole batch with `NotFound`. Returns the row count.
    async fn move_tasks(&self, moves: &[TaskMove]) -> Result<u64, StoreError>;

    /// Delete a task.
    async fn delete_task(&self, task_id: &TaskId) -> Result<(), StoreError>;

    /// Count tasks matching the filter (used by performance reports).
    async fn count_tasks(&self, filter: &TaskCountFilter) -> Result<i64, StoreError>;
}
