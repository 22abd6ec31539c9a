//! Workspace handlers: create, list, get, info, update, delete, invite codes, join.

use axum::extract::{Path, State};
use axum::Json;
use rand_core::RngCore;
use taskboard_storage::{
    CreateMemberParams, CreateWorkspaceParams, MemberRole, Store, StoreError, WorkspaceId,
};

use crate::api::{
    ApiWorkspace, CreateWorkspaceRequest, JoinWorkspaceRequest, Payload, UpdateWorkspaceRequest,
    WorkspaceInfo, WorkspaceRef,
};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{parse_id, require_name};
use crate::server::AppServer;

pub const INVITE_CODE_LENGTH: usize = 6;

const INVITE_CODE_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Opaque invite token; regenerating it invalidates previously shared links.
pub fn generate_invite_code(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rand_core::OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| INVITE_CODE_CHARSET[*b as usize % INVITE_CODE_CHARSET.len()] as char)
        .collect()
}

pub async fn list_workspaces(
    State(server): State<AppServer>,
    auth: AuthUser,
) -> Result<Json<Payload<Vec<ApiWorkspace>>>, ApiError> {
    let workspaces = server
        .store
        .list_workspaces_for_user(&auth.0)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list workspaces: {e}")))?
        .into_iter()
        .map(ApiWorkspace::from)
        .collect();

    Ok(Json(Payload::new(workspaces)))
}

pub async fn get_workspace(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Payload<ApiWorkspace>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&workspace_id, "workspace")?);
    server.require_member(&workspace_id, &auth.0).await?;

    let workspace = server
        .store
        .get_workspace(&workspace_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Workspace not found"),
            other => ApiError::internal(format!("Failed to get workspace: {other}")),
        })?;

    Ok(Json(Payload::new(workspace.into())))
}

/// Lightweight id/name/image view for the pre-join invite screen: requires
/// authentication but not membership.
pub async fn get_workspace_info(
    State(server): State<AppServer>,
    _auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Payload<WorkspaceInfo>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&workspace_id, "workspace")?);
    let workspace = server
        .store
        .get_workspace(&workspace_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Workspace not found"),
            other => ApiError::internal(format!("Failed to get workspace: {other}")),
        })?;

    Ok(Json(Payload::new(workspace.into())))
}

pub async fn create_workspace(
    State(server): State<AppServer>,
    auth: AuthUser,
    Json(req): Json<CreateWorkspaceRequest>,
) -> Result<Json<Payload<ApiWorkspace>>, ApiError> {
    let name = require_name(&req.name)?;

    let workspace = server
        .store
        .create_workspace(&CreateWorkspaceParams {
            name,
            owner_user_id: auth.0.clone(),
            image: req.image,
            invite_code: generate_invite_code(INVITE_CODE_LENGTH),
        })
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create workspace: {e}")))?;

    Ok(Json(Payload::with_message(
        workspace.into(),
        "Workspace has been created",
    )))
}

pub async fn update_workspace(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(workspace_id): Path<String>,
    Json(req): Json<UpdateWorkspaceRequest>,
) -> Result<Json<Payload<ApiWorkspace>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&workspace_id, "workspace")?);
    server.require_admin(&workspace_id, &auth.0).await?;

    let existing = server
        .store
        .get_workspace(&workspace_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Workspace not found"),
            other => ApiError::internal(format!("Failed to get workspace: {other}")),
        })?;

    let name = match req.name {
        Some(name) => require_name(&name)?,
        None => existing.name.clone(),
    };
    let image = req.image.or(existing.image);

    server
        .store
        .update_workspace(&workspace_id, &name, image)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Workspace not found"),
            other => ApiError::internal(format!("Failed to update workspace: {other}")),
        })?;

    let workspace = server
        .store
        .get_workspace(&workspace_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get workspace: {e}")))?;

    Ok(Json(Payload::with_message(
        workspace.into(),
        "Workspace has been updated",
    )))
}

pub async fn delete_workspace(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Payload<WorkspaceRef>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&workspace_id, "workspace")?);
    server.require_admin(&workspace_id, &auth.0).await?;

    server
        .store
        .delete_workspace(&workspace_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Workspace not found"),
            other => ApiError::internal(format!("Failed to delete workspace: {other}")),
        })?;

    Ok(Json(Payload::with_message(
        WorkspaceRef {
            id: workspace_id.0.to_string(),
        },
        "Workspace has been deleted",
    )))
}

pub async fn reset_invite_code(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Payload<ApiWorkspace>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&workspace_id, "workspace")?);
    server.require_admin(&workspace_id, &auth.0).await?;

    let code = generate_invite_code(INVITE_CODE_LENGTH);
    server
        .store
        .set_invite_code(&workspace_id, &code)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Workspace not found"),
            other => ApiError::internal(format!("Failed to reset invite code: {other}")),
        })?;

    let workspace = server
        .store
        .get_workspace(&workspace_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get workspace: {e}")))?;

    Ok(Json(Payload::with_message(
        workspace.into(),
        "Invite code has been reset",
    )))
}

pub async fn join_workspace(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(workspace_id): Path<String>,
    Json(req): Json<JoinWorkspaceRequest>,
) -> Result<Json<Payload<ApiWorkspace>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&workspace_id, "workspace")?);

    if req.code.len() != INVITE_CODE_LENGTH {
        return Err(ApiError::invalid("Invalid invite code"));
    }

    match server.store.get_member_by_user(&workspace_id, &auth.0).await {
        Ok(_) => return Err(ApiError::invalid("Already a member of workspace")),
        Err(StoreError::NotFound) => {}
        Err(other) => {
            return Err(ApiError::internal(format!(
                "Failed to resolve membership: {other}"
            )))
        }
    }

    let workspace = server
        .store
        .get_workspace(&workspace_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Workspace not found"),
            other => ApiError::internal(format!("Failed to get workspace: {other}")),
        })?;

    if workspace.invite_code != req.code {
        return Err(ApiError::invalid("Invalid invite code"));
    }

    server
        .store
        .create_member(&CreateMemberParams {
            user_id: auth.0.clone(),
            workspace_id: workspace_id.clone(),
            role: MemberRole::Member,
        })
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists => ApiError::invalid("Already a member of workspace"),
            other => ApiError::internal(format!("Failed to join workspace: {other}")),
        })?;

    Ok(Json(Payload::with_message(
        workspace.into(),
        "You have joined the workspace",
    )))
}
