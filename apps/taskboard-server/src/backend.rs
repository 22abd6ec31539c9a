//! StoreBackend abstracts over the SQLite and PostgreSQL implementations.

use std::sync::Arc;

use taskboard_storage::*;
use taskboard_store_postgres::PostgresStore;
use taskboard_store_sqlite::SqliteStore;

/// Selected at startup from the database URL scheme.
#[derive(Clone)]
pub enum StoreBackend {
    Sqlite(Arc<SqliteStore>),
    Postgres(Arc<PostgresStore>),
}

impl StoreBackend {
    /// Open the backend matching the URL scheme (`postgres:` or `sqlite:`).
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        if database_url.starts_with("postgres:") {
            let store = PostgresStore::open(database_url).await?;
            Ok(StoreBackend::Postgres(Arc::new(store)))
        } else {
            let store = SqliteStore::open(database_url).await?;
            Ok(StoreBackend::Sqlite(Arc::new(store)))
        }
    }
}

#[async_trait::async_trait]
impl Store for StoreBackend {
    async fn create_user(&self, params: &CreateUserParams) -> Result<User, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.create_user(params).await,
            StoreBackend::Postgres(s) => s.create_user(params).await,
        }
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_user(user_id).await,
            StoreBackend::Postgres(s) => s.get_user(user_id).await,
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_user_by_email(email).await,
            StoreBackend::Postgres(s) => s.get_user_by_email(email).await,
        }
    }

    async fn list_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_users_by_ids(ids).await,
            StoreBackend::Postgres(s) => s.list_users_by_ids(ids).await,
        }
    }

    async fn update_user(
        &self,
        user_id: &UserId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.update_user(user_id, name, image).await,
            StoreBackend::Postgres(s) => s.update_user(user_id, name, image).await,
        }
    }

    async fn delete_user(&self, user_id: &UserId) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.delete_user(user_id).await,
            StoreBackend::Postgres(s) => s.delete_user(user_id).await,
        }
    }

    async fn create_workspace(
        &self,
        params: &CreateWorkspaceParams,
    ) -> Result<Workspace, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.create_workspace(params).await,
            StoreBackend::Postgres(s) => s.create_workspace(params).await,
        }
    }

    async fn get_workspace(&self, workspace_id: &WorkspaceId) -> Result<Workspace, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_workspace(workspace_id).await,
            StoreBackend::Postgres(s) => s.get_workspace(workspace_id).await,
        }
    }

    async fn list_workspaces_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Workspace>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_workspaces_for_user(user_id).await,
            StoreBackend::Postgres(s) => s.list_workspaces_for_user(user_id).await,
        }
    }

    async fn update_workspace(
        &self,
        workspace_id: &WorkspaceId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.update_workspace(workspace_id, name, image).await,
            StoreBackend::Postgres(s) => s.update_workspace(workspace_id, name, image).await,
        }
    }

    async fn set_invite_code(
        &self,
        workspace_id: &WorkspaceId,
        code: &str,
    ) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.set_invite_code(workspace_id, code).await,
            StoreBackend::Postgres(s) => s.set_invite_code(workspace_id, code).await,
        }
    }

    async fn delete_workspace(&self, workspace_id: &WorkspaceId) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.delete_workspace(workspace_id).await,
            StoreBackend::Postgres(s) => s.delete_workspace(workspace_id).await,
        }
    }

    async fn create_member(&self, params: &CreateMemberParams) -> Result<Member, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.create_member(params).await,
            StoreBackend::Postgres(s) => s.create_member(params).await,
        }
    }

    async fn get_member(&self, member_id: &MemberId) -> Result<Member, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_member(member_id).await,
            StoreBackend::Postgres(s) => s.get_member(member_id).await,
        }
    }

    async fn get_member_by_user(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Member, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_member_by_user(workspace_id, user_id).await,
            StoreBackend::Postgres(s) => s.get_member_by_user(workspace_id, user_id).await,
        }
    }

    async fn list_members(&self, workspace_id: &WorkspaceId) -> Result<Vec<Member>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_members(workspace_id).await,
            StoreBackend::Postgres(s) => s.list_members(workspace_id).await,
        }
    }

    async fn list_members_by_ids(&self, ids: &[MemberId]) -> Result<Vec<Member>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_members_by_ids(ids).await,
            StoreBackend::Postgres(s) => s.list_members_by_ids(ids).await,
        }
    }

    async fn count_members(&self, workspace_id: &WorkspaceId) -> Result<i64, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.count_members(workspace_id).await,
            StoreBackend::Postgres(s) => s.count_members(workspace_id).await,
        }
    }

    async fn count_admins(&self, workspace_id: &WorkspaceId) -> Result<i64, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.count_admins(workspace_id).await,
            StoreBackend::Postgres(s) => s.count_admins(workspace_id).await,
        }
    }

    async fn update_member_role(
        &self,
        member_id: &MemberId,
        role: MemberRole,
    ) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.update_member_role(member_id, role).await,
            StoreBackend::Postgres(s) => s.update_member_role(member_id, role).await,
        }
    }

    async fn delete_member(&self, member_id: &MemberId) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.delete_member(member_id).await,
            StoreBackend::Postgres(s) => s.delete_member(member_id).await,
        }
    }

    async fn create_project(&self, params: &CreateProjectParams) -> Result<Project, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.create_project(params).await,
            StoreBackend::Postgres(s) => s.create_project(params).await,
        }
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<Project, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_project(project_id).await,
            StoreBackend::Postgres(s) => s.get_project(project_id).await,
        }
    }

    async fn list_projects(&self, workspace_id: &WorkspaceId) -> Result<Vec<Project>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_projects(workspace_id).await,
            StoreBackend::Postgres(s) => s.list_projects(workspace_id).await,
        }
    }

    async fn list_projects_by_ids(&self, ids: &[ProjectId]) -> Result<Vec<Project>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_projects_by_ids(ids).await,
            StoreBackend::Postgres(s) => s.list_projects_by_ids(ids).await,
        }
    }

    async fn update_project(
        &self,
        project_id: &ProjectId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.update_project(project_id, name, image).await,
            StoreBackend::Postgres(s) => s.update_project(project_id, name, image).await,
        }
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.delete_project(project_id).await,
            StoreBackend::Postgres(s) => s.delete_project(project_id).await,
        }
    }

    async fn create_task(&self, params: &CreateTaskParams) -> Result<Task, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.create_task(params).await,
            StoreBackend::Postgres(s) => s.create_task(params).await,
        }
    }

    async fn get_task(&self, task_id: &TaskId) -> Result<Task, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_task(task_id).await,
            StoreBackend::Postgres(s) => s.get_task(task_id).await,
        }
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_tasks(filter).await,
            StoreBackend::Postgres(s) => s.list_tasks(filter).await,
        }
    }

    async fn list_tasks_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_tasks_by_ids(ids).await,
            StoreBackend::Postgres(s) => s.list_tasks_by_ids(ids).await,
        }
    }

    async fn max_task_position(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<i64>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.max_task_position(workspace_id).await,
            StoreBackend::Postgres(s) => s.max_task_position(workspace_id).await,
        }
    }

    async fn update_task(&self, task_id: &TaskId, update: &TaskUpdate) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.update_task(task_id, update).await,
            StoreBackend::Postgres(s) => s.update_task(task_id, update).await,
        }
    }

    async fn move_tasks(&self, moves: &[TaskMove]) -> Result<u64, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.move_tasks(moves).await,
            StoreBackend::Postgres(s) => s.move_tasks(moves).await,
        }
    }

    async fn delete_task(&self, task_id: &TaskId) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.delete_task(task_id).await,
            StoreBackend::Postgres(s) => s.delete_task(task_id).await,
        }
    }

    async fn count_tasks(&self, filter: &TaskCountFilter) -> Result<i64, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.count_tasks(filter).await,
            StoreBackend::Postgres(s) => s.count_tasks(filter).await,
        }
    }
}
