//! Member handlers: list, change role, remove.
//!
//! The workspace role invariants are enforced here: a workspace must keep at
//! least one member and at least one ADMIN through any role change or
//! removal. The demotion guard checks the workspace's total admin count, not
//! the target's own role, so a demotion request is refused whenever only one
//! admin is left. Removal preserves the admin invariant structurally: the
//! actor must be an admin distinct from the target.

use axum::extract::{Path, Query, State};
use axum::Json;
use taskboard_storage::{MemberId, MemberRole, Store, StoreError, WorkspaceId};

use crate::api::{ApiMember, MemberRef, Payload, UpdateMemberRoleRequest, WorkspaceQuery};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::server::AppServer;

pub async fn list_members(
    State(server): State<AppServer>,
    auth: AuthUser,
    Query(query): Query<WorkspaceQuery>,
) -> Result<Json<Payload<Vec<ApiMember>>>, ApiError> {
    let workspace_id = WorkspaceId(parse_id(&query.workspace_id, "workspace")?);
    server.require_member(&workspace_id, &auth.0).await?;

    let members = server
        .store
        .list_members(&workspace_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list members: {e}")))?;

    let user_ids: Vec<_> = members.iter().map(|m| m.user_id.clone()).collect();
    let users = server
        .store
        .list_users_by_ids(&user_ids)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list users: {e}")))?;

    let populated = members
        .into_iter()
        .map(|member| {
            let user = users.iter().find(|u| u.id == member.user_id);
            ApiMember::populated(member, user)
        })
        .collect();

    Ok(Json(Payload::new(populated)))
}

pub async fn update_member_role(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(member_id): Path<String>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> Result<Json<Payload<MemberRef>>, ApiError> {
    let member_id = MemberId(parse_id(&member_id, "member")?);
    let role: MemberRole = req
        .role
        .parse()
        .map_err(|_| ApiError::invalid("Invalid role"))?;

    let target = server
        .store
        .get_member(&member_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Member not found"),
            other => ApiError::internal(format!("Failed to get member: {other}")),
        })?;

    let actor = server.require_member(&target.workspace_id, &auth.0).await?;
    if !actor.role.is_admin() {
        return Err(ApiError::forbidden("You do not have permission"));
    }

    if role != MemberRole::Admin {
        let admins = server
            .store
            .count_admins(&target.workspace_id)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to count admins: {e}")))?;
        if admins <= 1 {
            return Err(ApiError::invalid(
                "There must be at least one admin in the workspace",
            ));
        }
    }

    let members = server
        .store
        .count_members(&target.workspace_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count members: {e}")))?;
    if members <= 1 {
        return Err(ApiError::invalid("At least one member must remain"));
    }

    server
        .store
        .update_member_role(&member_id, role)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Member not found"),
            other => ApiError::internal(format!("Failed to update member role: {other}")),
        })?;

    Ok(Json(Payload::with_message(
        MemberRef {
            id: target.id.0.to_string(),
            workspace_id: target.workspace_id.0.to_string(),
        },
        "Member role has been updated",
    )))
}

pub async fn remove_member(
    State(server): State<AppServer>,
    auth: AuthUser,
    Path(member_id): Path<String>,
) -> Result<Json<Payload<MemberRef>>, ApiError> {
    let member_id = MemberId(parse_id(&member_id, "member")?);

    let target = server
        .store
        .get_member(&member_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Member not found"),
            other => ApiError::internal(format!("Failed to get member: {other}")),
        })?;

    let actor = server.require_member(&target.workspace_id, &auth.0).await?;

    if actor.id == target.id {
        return Err(ApiError::invalid(
            "You cannot remove yourself. Please contact an admin.",
        ));
    }

    if !actor.role.is_admin() {
        return Err(ApiError::forbidden(
            "You do not have permission to delete this member",
        ));
    }

    let members = server
        .store
        .count_members(&target.workspace_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count members: {e}")))?;
    if members <= 1 {
        return Err(ApiError::invalid("You can not remove the only member"));
    }

    // The last admin can never be removed: self-removal is banned and only
    // admins may remove others, so a removable admin target implies a second
    // admin (the actor) stays behind.
    server
        .store
        .delete_member(&member_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("Member not found"),
            other => ApiError::internal(format!("Failed to delete member: {other}")),
        })?;

    Ok(Json(Payload::with_message(
        MemberRef {
            id: target.id.0.to_string(),
            workspace_id: target.workspace_id.0.to_string(),
        },
        "Member deleted successfully",
    )))
}
