//! Performance reports: month-over-month task counts for a workspace or a
//! project, recomputed on every read.
//!
//! Month boundaries are calendar month start/end in server-local time. The
//! "assigned" segment is scoped to the calling member's own id. `compute`
//! takes the reference instant as a parameter so tests can pin the clock.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use taskboard_storage::{
    MemberId, ProjectId, Store, StoreError, TaskCountFilter, TaskStatus, WorkspaceId,
};

use crate::api::{Payload, PerformanceCounts};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::server::AppServer;

pub(crate) enum ReportScope {
    Workspace(WorkspaceId),
    Project(ProjectId),
}

pub(crate) struct MonthWindows {
    pub this_start: DateTime<Utc>,
    pub this_end: DateTime<Utc>,
    pub last_start: DateTime<Utc>,
    pub last_end: DateTime<Utc>,
}

fn local_month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Current and previous calendar month windows around `now`, inclusive ends.
pub(crate) fn month_windows(now: DateTime<Local>) -> Option<MonthWindows> {
    let (year, month) = (now.year(), now.month());
    let this_start = local_month_start(year, month)?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_start = local_month_start(next_year, next_month)?;

    let (last_year, last_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };
    let last_start = local_month_start(last_year, last_month)?;

    Some(MonthWindows {
        this_start,
        this_end: next_start - Duration::seconds(1),
        last_start,
        last_end: this_start - Duration::seconds(1),
    })
}

async fn window_count(
    server: &AppServer,
    mut filter: TaskCountFilter,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<i64, ApiError> {
    filter.created_from = Some(from);
    filter.created_to = Some(to);
    server
        .store
        .count_tasks(&filter)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count tasks: {e}")))
}

pub(crate) async fn compute(
    server: &AppServer,
    scope: ReportScope,
    member_id: &MemberId,
    now: DateTime<Local>,
) -> Result<PerformanceCounts, ApiError> {
    let windows = month_windows(now)
        .ok_or_else(|| ApiError::internal("failed to compute month boundaries"))?;
    let now_utc = now.with_timezone(&Utc);

    let mut base = TaskCountFilter::default();
    match scope {
        ReportScope::Workspace(workspace_id) => base.workspace_id = Some(workspace_id),
        ReportScope::Project(project_id) => base.project_id = Some(project_id),
    }

    let mut assigned = base.clone();
    assigned.assignee_id = Some(member_id.clone());

    let mut completed = base.clone();
    completed.status = Some(TaskStatus::Done);

    let mut incompleted = base.clone();
    incompleted.status_not = Some(TaskStatus::Done);

    let mut overdue = base.clone();
    overdue.status_not = Some(TaskStatus::Done);
    overdue.due_before = Some(now_utc);

    let task_count = window_count(server, base.clone(), windows.this_start, windows.this_end).await?;
    let last_task_count =
        window_count(server, base.clone(), windows.last_start, windows.last_end).await?;

    let assigned_task_count =
        window_count(server, assigned.clone(), windows.this_start, windows.this_end).await?;
    let last_assigned_task_count =
        window_count(server, assigned, windows.last_start, windows.last_end).await?;

    let completed_task_count =
        window_count(server, completed.clone(), windows.this_start, windows.this_end).await?;
    let last_completed_task_count =
        window_count(server, completed, windows.last_start, windows.last_end).await?;

    let incompleted_task_count = window_count(
        server,
        incompleted.clone(),
        windows.this_start,
        windows.this_end,
    )
    .await?;
    let last_incompleted_task_count =
        window_count(server, incompleted, windows.last_start, windows.last_end).await?;

    let overdue_task_count =
        window_count(server, overdue.clone(), windows.this_start, windows.this_end).await?;
    let last_overdue_task_count =
        window_count(server, overdue, windows.last_start, windows.last_end).await?;

    Ok(PerformanceCounts {
        task_count,
        task_difference: task_count - last_task_count,
        assigned_task_count,
        assigned_task_difference: assigned_task_count - last_assigned_task_count,
        completed_task_count,
        completed_task_difference: completed_task_count - last_completed_task_count,
        incompleted_task_count,
        incompleted_task_difference: incompleted_task_count - last_incompleted_task_count,
        overdue_task_count,
        overdue_task_difference: overdue_task_count - last_overdue_task_count,
    })
}

pub async fn workspace_performance(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Payload<PerformanceCounts>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&workspace_id, "workspace")?);
    let member = server.require_member(&workspace_id, &auth.0).await?;

    let counts = compute(
        &server,
        ReportScope::Workspace(workspace_id),
        &member.id,
        Local::now(),
    )
    .await?;
    Ok(Json(Payload::new(counts)))
}

pub async fn project_performance(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<Payload<PerformanceCounts>>, ApiError> {
    let project_id = ProjectId(parse_id(&project_id, "project")?);

    let project = server
        .store
        .get_project(&project_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Project not found"),
            other => ApiError::internal(format!("Failed to get project: {other}")),
        })?;

    let member = server.require_member(&project.workspace_id, &auth.0).await?;

    let counts = compute(
        &server,
        ReportScope::Project(project_id),
        &member.id,
        Local::now(),
    )
    .await?;
    Ok(Json(Payload::new(counts)))
}
