//! Project handlers: create, list, get, update, delete.
//!
//! Any member can create and read projects; update and delete are
//! admin-gated. Deleting a project takes its tasks with it.

use axum::extract::{Path, Query, State};
use axum::Json;
use taskboard_storage::{CreateProjectParams, ProjectId, Store, StoreError, WorkspaceId};

use crate::api::{ApiProject, CreateProjectRequest, Payload, UpdateProjectRequest, WorkspaceQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{parse_id, require_name};
use crate::server::AppServer;

pub async fn list_projects(
    State(server): State<AppServer>,
    auth: AuthUser,
    Query(query): Query<WorkspaceQuery>,
) -> Result<Json<Payload<Vec<ApiProject>>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&query.workspace_id, "workspace")?);
    server.require_member(&workspace_id, &auth.0).await?;

    let projects = server
        .store
        .list_projects(&workspace_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list projects: {e}")))?
        .into_iter()
        .map(ApiProject::from)
        .collect();

    Ok(Json(Payload::new(projects)))
}

pub async fn get_project(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<Payload<ApiProject>>, ApiError> {
    let project_id = ProjectId(parse_id(&project_id, "project")?);

    let project = server
        .store
        .get_project(&project_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Project not found"),
            other => ApiError::internal(format!("Failed to get project: {other}")),
        })?;

    server.require_member(&project.workspace_id, &auth.0).await?;

    Ok(Json(Payload::new(project.into())))
}

pub async fn create_project(
    State(server): State<AppServer>,
    auth: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<Payload<ApiProject>>, ApiError> {
    let name = require_name(&req.name)?;
    let workspace_id = WorkspaceId(parse_id(&req.workspace_id, "workspace")?);
    server.require_member(&workspace_id, &auth.0).await?;

    let project = server
        .store
        .create_project(&CreateProjectParams {
            workspace_id,
            name,
            image: req.image,
        })
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create project: {e}")))?;

    Ok(Json(Payload::with_message(
        project.into(),
        "Project has been created",
    )))
}

pub async fn update_project(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(project_id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Payload<ApiProject>>, ApiError> {
    let project_id = ProjectId(parse_id(&project_id, "project")?);

    let existing = server
        .store
        .get_project(&project_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Project not found"),
            other => ApiError::internal(format!("Failed to get project: {other}")),
        })?;

    server.require_admin(&existing.workspace_id, &auth.0).await?;

    let name = match req.name {
        Some(name) => require_name(&name)?,
        None => existing.name.clone(),
    };
    let image = req.image.or(existing.image);

    server
        .store
        .update_project(&project_id, &name, image)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Project not found"),
            other => ApiError::internal(format!("Failed to update project: {other}")),
        })?;

    let project = server
        .store
        .get_project(&project_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get project: {e}")))?;

    Ok(Json(Payload::with_message(
        project.into(),
        "Project has been updated",
    )))
}

pub async fn delete_project(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<Payload<ApiProject>>, ApiError> {
    let project_id = ProjectId(parse_id(&project_id, "project")?);

    let project = server
        .store
        .get_project(&project_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Project not found"),
            other => ApiError::internal(format!("Failed to get project: {other}")),
        })?;

    server.require_admin(&project.workspace_id, &auth.0).await?;

    server
        .store
        .delete_project(&project_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Project not found"),
            other => ApiError::internal(format!("Failed to delete project: {other}")),
        })?;

    Ok(Json(Payload::with_message(
        project.into(),
        "Project has been deleted",
    )))
}
