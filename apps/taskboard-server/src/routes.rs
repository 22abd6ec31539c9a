//! Route wiring: the API router and the ops router (health + metrics).

use axum::routing::{get, patch, post};
use axum::{middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers::{members, projects, reports, tasks, users, workspaces};
use crate::metrics::track_http;
use crate::server::AppServer;

pub fn router(server: AppServer) -> Router {
    Router::new()
        .route(
            "/api/workspaces",
            get(workspaces::list_workspaces).post(workspaces::create_workspace),
        )
        .route(
            "/api/workspaces/{workspace_id}",
            get(workspaces::get_workspace)
                .patch(workspaces::update_workspace)
                .delete(workspaces::delete_workspace),
        )
        .route(
            "/api/workspaces/{workspace_id}/info",
            get(workspaces::get_workspace_info),
        )
        .route(
            "/api/workspaces/{workspace_id}/performance",
            get(reports::workspace_performance),
        )
        .route(
            "/api/workspaces/{workspace_id}/reset-invite-code",
            post(workspaces::reset_invite_code),
        )
        .route(
            "/api/workspaces/{workspace_id}/join",
            post(workspaces::join_workspace),
        )
        .route("/api/members", get(members::list_members))
        .route(
            "/api/members/{member_id}",
            patch(members::update_member_role).delete(members::remove_member),
        )
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/{project_id}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/api/projects/{project_id}/performance",
            get(reports::project_performance),
        )
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/api/tasks/move-board", post(tasks::move_board))
        .route(
            "/api/tasks/{task_id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/api/users/me",
            get(users::get_current_user)
                .patch(users::update_current_user)
                .delete(users::delete_current_user),
        )
        .layer(middleware::from_fn(track_http))
        .with_state(server)
}

/// Liveness/readiness probes and the Prometheus scrape endpoint.
pub fn ops_router(metrics_handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/readyz", get(|| async { "ok" }))
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        )
}
