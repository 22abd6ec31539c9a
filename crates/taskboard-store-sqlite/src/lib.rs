//! SQLite backend for taskboard storage.
//!
//! Ids are stored as UUID text, timestamps as unix seconds. Foreign keys are
//! switched on per connection so cascade deletes and assignee nullification
//! behave the same as on PostgreSQL.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, SqlitePool};
use uuid::Uuid;

use taskboard_storage::*;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .foreign_keys(true);

        // Single connection: keeps in-memory databases coherent across calls.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, StoreError> {
    Uuid::try_parse(s).map_err(|e| StoreError::Backend(e.to_string()))
}

fn datetime(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Backend(format!("timestamp out of range: {secs}")))
}

fn map_unique(e: sqlx::Error) -> StoreError {
    let s = e.to_string();
    if s.contains("UNIQUE") {
        StoreError::AlreadyExists
    } else {
        StoreError::Backend(s)
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(User {
        id: UserId(parse_uuid(&id)?),
        name: row
            .try_get("name")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        email: row
            .try_get("email")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        image: row
            .try_get("image")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        created_at: datetime(created_at)?,
        updated_at: datetime(updated_at)?,
    })
}

fn workspace_from_row(row: &SqliteRow) -> Result<Workspace, StoreError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let owner: String = row
        .try_get("owner_user_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(Workspace {
        id: WorkspaceId(parse_uuid(&id)?),
        name: row
            .try_get("name")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        owner_user_id: UserId(parse_uuid(&owner)?),
        image: row
            .try_get("image")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        invite_code: row
            .try_get("invite_code")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        created_at: datetime(created_at)?,
        updated_at: datetime(updated_at)?,
    })
}

fn member_from_row(row: &SqliteRow) -> Result<Member, StoreError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let workspace_id: String = row
        .try_get("workspace_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let role: String = row
        .try_get("role")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(Member {
        id: MemberId(parse_uuid(&id)?),
        user_id: UserId(parse_uuid(&user_id)?),
        workspace_id: WorkspaceId(parse_uuid(&workspace_id)?),
        role: role
            .parse::<MemberRole>()
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        created_at: datetime(created_at)?,
        updated_at: datetime(updated_at)?,
    })
}

fn project_from_row(row: &SqliteRow) -> Result<Project, StoreError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let workspace_id: String = row
        .try_get("workspace_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(Project {
        id: ProjectId(parse_uuid(&id)?),
        workspace_id: WorkspaceId(parse_uuid(&workspace_id)?),
        name: row
            .try_get("name")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        image: row
            .try_get("image")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        created_at: datetime(created_at)?,
        updated_at: datetime(updated_at)?,
    })
}

fn task_from_row(row: &SqliteRow) -> Result<Task, StoreError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let workspace_id: String = row
        .try_get("workspace_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let project_id: String = row
        .try_get("project_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let assignee_id: Option<String> = row
        .try_get("assignee_id")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let status: String = row
        .try_get("status")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let due_date: i64 = row
        .try_get("due_date")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(Task {
        id: TaskId(parse_uuid(&id)?),
        workspace_id: WorkspaceId(parse_uuid(&workspace_id)?),
        project_id: ProjectId(parse_uuid(&project_id)?),
        assignee_id: match assignee_id {
            Some(s) => Some(MemberId(parse_uuid(&s)?)),
            None => None,
        },
        name: row
            .try_get("name")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        status: status
            .parse::<TaskStatus>()
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        position: row
            .try_get("position")
            .map_err(|e| StoreError::Backend(e.to_string()))?,
        due_date: datetime(due_date)?,
        created_at: datetime(created_at)?,
        updated_at: datetime(updated_at)?,
    })
}

const TASK_COLUMNS: &str = "id, workspace_id, project_id, assignee_id, name, description, status, position, due_date, created_at, updated_at";

#[async_trait::async_trait]
impl Store for SqliteStore {
    // ───────────────────────────────────── Users ──────────────────────────────────────

    async fn create_user(&self, params: &CreateUserParams) -> Result<User, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO users(id, name, email, password_hash, image, created_at, updated_at)
             VALUES(?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(&params.name)
        .bind(&params.email)
        .bind(&params.password_hash)
        .bind(&params.image)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_unique)?;

        self.get_user(&UserId(id)).await
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or(StoreError::NotFound)?;
        user_from_row(&row)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or(StoreError::NotFound)?;
        user_from_row(&row)
    }

    async fn list_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut qb = QueryBuilder::<sqlx::Sqlite>::new("SELECT * FROM users WHERE id IN (");
        {
            let mut sep = qb.separated(", ");
            for id in ids {
                sep.push_bind(id.0.to_string());
            }
        }
        qb.push(")");
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(user_from_row).collect()
    }

    async fn update_user(
        &self,
        user_id: &UserId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError> {
        let res = sqlx::query("UPDATE users SET name = ?, image = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(image)
            .bind(Utc::now().timestamp())
            .bind(user_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &UserId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ─────────────────────────────────── Workspaces ───────────────────────────────────

    async fn create_workspace(
        &self,
        params: &CreateWorkspaceParams,
    ) -> Result<Workspace, StoreError> {
        let ws_id = Uuid::now_v7();
        let member_id = Uuid::now_v7();
        let now = Utc::now().timestamp();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        sqlx::query(
            "INSERT INTO workspaces(id, name, owner_user_id, image, invite_code, created_at, updated_at)
             VALUES(?,?,?,?,?,?,?)",
        )
        .bind(ws_id.to_string())
        .bind(&params.name)
        .bind(params.owner_user_id.0.to_string())
        .bind(&params.image)
        .bind(&params.invite_code)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        sqlx::query(
            "INSERT INTO members(id, user_id, workspace_id, role, created_at, updated_at)
             VALUES(?,?,?,?,?,?)",
        )
        .bind(member_id.to_string())
        .bind(params.owner_user_id.0.to_string())
        .bind(ws_id.to_string())
        .bind(MemberRole::Admin.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        self.get_workspace(&WorkspaceId(ws_id)).await
    }

    async fn get_workspace(&self, workspace_id: &WorkspaceId) -> Result<Workspace, StoreError> {
        let row = sqlx::query("SELECT * FROM workspaces WHERE id = ?")
            .bind(workspace_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or(StoreError::NotFound)?;
        workspace_from_row(&row)
    }

    async fn list_workspaces_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Workspace>, StoreError> {
        let rows = sqlx::query(
            "SELECT w.* FROM workspaces w
             JOIN members m ON m.workspace_id = w.id
             WHERE m.user_id = ?
             ORDER BY w.created_at DESC",
        )
        .bind(user_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(workspace_from_row).collect()
    }

    async fn update_workspace(
        &self,
        workspace_id: &WorkspaceId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError> {
        let res =
            sqlx::query("UPDATE workspaces SET name = ?, image = ?, updated_at = ? WHERE id = ?")
                .bind(name)
                .bind(image)
                .bind(Utc::now().timestamp())
                .bind(workspace_id.0.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn set_invite_code(
        &self,
        workspace_id: &WorkspaceId,
        code: &str,
    ) -> Result<(), StoreError> {
        let res = sqlx::query("UPDATE workspaces SET invite_code = ?, updated_at = ? WHERE id = ?")
            .bind(code)
            .bind(Utc::now().timestamp())
            .bind(workspace_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_workspace(&self, workspace_id: &WorkspaceId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM workspaces WHERE id = ?")
            .bind(workspace_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ──────────────────────────────────── Members ─────────────────────────────────────

    async fn create_member(&self, params: &CreateMemberParams) -> Result<Member, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO members(id, user_id, workspace_id, role, created_at, updated_at)
             VALUES(?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.user_id.0.to_string())
        .bind(params.workspace_id.0.to_string())
        .bind(params.role.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_unique)?;

        self.get_member(&MemberId(id)).await
    }

    async fn get_member(&self, member_id: &MemberId) -> Result<Member, StoreError> {
        let row = sqlx::query("SELECT * FROM members WHERE id = ?")
            .bind(member_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or(StoreError::NotFound)?;
        member_from_row(&row)
    }

    async fn get_member_by_user(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Member, StoreError> {
        let row = sqlx::query("SELECT * FROM members WHERE workspace_id = ? AND user_id = ?")
            .bind(workspace_id.0.to_string())
            .bind(user_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or(StoreError::NotFound)?;
        member_from_row(&row)
    }

    async fn list_members(&self, workspace_id: &WorkspaceId) -> Result<Vec<Member>, StoreError> {
        let rows = sqlx::query("SELECT * FROM members WHERE workspace_id = ? ORDER BY created_at")
            .bind(workspace_id.0.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(member_from_row).collect()
    }

    async fn list_members_by_ids(&self, ids: &[MemberId]) -> Result<Vec<Member>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut qb = QueryBuilder::<sqlx::Sqlite>::new("SELECT * FROM members WHERE id IN (");
        {
            let mut sep = qb.separated(", ");
            for id in ids {
                sep.push_bind(id.0.to_string());
            }
        }
        qb.push(")");
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(member_from_row).collect()
    }

    async fn count_members(&self, workspace_id: &WorkspaceId) -> Result<i64, StoreError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM members WHERE workspace_id = ?")
                .bind(workspace_id.0.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(count)
    }

    async fn count_admins(&self, workspace_id: &WorkspaceId) -> Result<i64, StoreError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM members WHERE workspace_id = ? AND role = ?")
                .bind(workspace_id.0.to_string())
                .bind(MemberRole::Admin.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(count)
    }

    async fn update_member_role(
        &self,
        member_id: &MemberId,
        role: MemberRole,
    ) -> Result<(), StoreError> {
        let res = sqlx::query("UPDATE members SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(Utc::now().timestamp())
            .bind(member_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_member(&self, member_id: &MemberId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(member_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ──────────────────────────────────── Projects ────────────────────────────────────

    async fn create_project(&self, params: &CreateProjectParams) -> Result<Project, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO projects(id, workspace_id, name, image, created_at, updated_at)
             VALUES(?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.workspace_id.0.to_string())
        .bind(&params.name)
        .bind(&params.image)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        self.get_project(&ProjectId(id)).await
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<Project, StoreError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(project_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or(StoreError::NotFound)?;
        project_from_row(&row)
    }

    async fn list_projects(&self, workspace_id: &WorkspaceId) -> Result<Vec<Project>, StoreError> {
        let rows =
            sqlx::query("SELECT * FROM projects WHERE workspace_id = ? ORDER BY created_at DESC")
                .bind(workspace_id.0.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(project_from_row).collect()
    }

    async fn list_projects_by_ids(&self, ids: &[ProjectId]) -> Result<Vec<Project>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut qb = QueryBuilder::<sqlx::Sqlite>::new("SELECT * FROM projects WHERE id IN (");
        {
            let mut sep = qb.separated(", ");
            for id in ids {
                sep.push_bind(id.0.to_string());
            }
        }
        qb.push(")");
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(project_from_row).collect()
    }

    async fn update_project(
        &self,
        project_id: &ProjectId,
        name: &str,
        image: Option<String>,
    ) -> Result<(), StoreError> {
        let res =
            sqlx::query("UPDATE projects SET name = ?, image = ?, updated_at = ? WHERE id = ?")
                .bind(name)
                .bind(image)
                .bind(Utc::now().timestamp())
                .bind(project_id.0.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ───────────────────────────────────── Tasks ──────────────────────────────────────

    async fn create_task(&self, params: &CreateTaskParams) -> Result<Task, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        sqlx::query(
            "INSERT INTO tasks(id, workspace_id, project_id, assignee_id, name, description, status, position, due_date, created_at, updated_at)
             VALUES(?,?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.workspace_id.0.to_string())
        .bind(params.project_id.0.to_string())
        .bind(params.assignee_id.0.to_string())
        .bind(&params.name)
        .bind(&params.description)
        .bind(params.status.as_str())
        .bind(params.position)
        .bind(params.due_date.timestamp())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        self.get_task(&TaskId(id)).await
    }

    async fn get_task(&self, task_id: &TaskId) -> Result<Task, StoreError> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(task_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or(StoreError::NotFound)?;
        task_from_row(&row)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE workspace_id = "
        ));
        qb.push_bind(filter.workspace_id.0.to_string());
        if let Some(project_id) = &filter.project_id {
            qb.push(" AND project_id = ");
            qb.push_bind(project_id.0.to_string());
        }
        if let Some(assignee_id) = &filter.assignee_id {
            qb.push(" AND assignee_id = ");
            qb.push_bind(assignee_id.0.to_string());
        }
        if let Some(status) = &filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status.as_str());
        }
        if let Some(due_date) = &filter.due_date {
            qb.push(" AND due_date = ");
            qb.push_bind(due_date.timestamp());
        }
        if let Some(search) = &filter.search {
            qb.push(" AND name LIKE ");
            qb.push_bind(format!("%{search}%"));
        }
        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(task_from_row).collect()
    }

    async fn list_tasks_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut qb = QueryBuilder::<sqlx::Sqlite>::new("SELECT * FROM tasks WHERE id IN (");
        {
            let mut sep = qb.separated(", ");
            for id in ids {
                sep.push_bind(id.0.to_string());
            }
        }
        qb.push(")");
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.iter().map(task_from_row).collect()
    }

    async fn max_task_position(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<i64>, StoreError> {
        let (max,): (Option<i64>,) =
            sqlx::query_as("SELECT MAX(position) FROM tasks WHERE workspace_id = ?")
                .bind(workspace_id.0.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(max)
    }

    async fn update_task(&self, task_id: &TaskId, update: &TaskUpdate) -> Result<(), StoreError> {
        let res = sqlx::query(
            "UPDATE tasks SET project_id = ?, assignee_id = ?, name = ?, description = ?, status = ?, due_date = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(update.project_id.0.to_string())
        .bind(update.assignee_id.as_ref().map(|m| m.0.to_string()))
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.status.as_str())
        .bind(update.due_date.timestamp())
        .bind(Utc::now().timestamp())
        .bind(task_id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn move_tasks(&self, moves: &[TaskMove]) -> Result<u64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let now = Utc::now().timestamp();
        let mut updated = 0u64;
        for entry in moves {
            let res =
                sqlx::query("UPDATE tasks SET status = ?, position = ?, updated_at = ? WHERE id = ?")
                    .bind(entry.status.as_str())
                    .bind(entry.position)
                    .bind(now)
                    .bind(entry.id.0.to_string())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
            if res.rows_affected() == 0 {
                // Dropping the transaction rolls back everything applied so far.
                return Err(StoreError::NotFound);
            }
            updated += res.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(updated)
    }

    async fn delete_task(&self, task_id: &TaskId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn count_tasks(&self, filter: &TaskCountFilter) -> Result<i64, StoreError> {
        let mut qb = QueryBuilder::<sqlx::Sqlite>::new("SELECT COUNT(*) FROM tasks WHERE 1 = 1");
        if let Some(workspace_id) = &filter.workspace_id {
            qb.push(" AND workspace_id = ");
            qb.push_bind(workspace_id.0.to_string());
        }
        if let Some(project_id) = &filter.project_id {
            qb.push(" AND project_id = ");
            qb.push_bind(project_id.0.to_string());
        }
        if let Some(assignee_id) = &filter.assignee_id {
            qb.push(" AND assignee_id = ");
            qb.push_bind(assignee_id.0.to_string());
        }
        if let Some(status) = &filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status.as_str());
        }
        if let Some(status_not) = &filter.status_not {
            qb.push(" AND status <> ");
            qb.push_bind(status_not.as_str());
        }
        if let Some(due_before) = &filter.due_before {
            qb.push(" AND due_date < ");
            qb.push_bind(due_before.timestamp());
        }
        if let Some(created_from) = &filter.created_from {
            qb.push(" AND created_at >= ");
            qb.push_bind(created_from.timestamp());
        }
        if let Some(created_to) = &filter.created_to {
            qb.push(" AND created_at <= ");
            qb.push_bind(created_to.timestamp());
        }

        let row = qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        row.try_get::<i64, _>(0)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
