//! Member types and the workspace role enum.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{MemberId, UserId, WorkspaceId};

/// Role a member holds within a workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberRole {
    Admin,
    Member,
}

/// Error type for parsing MemberRole from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMemberRoleError(pub String);

impl std::fmt::Display for ParseMemberRoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid member role: {}", self.0)
    }
}

impl std::error::Error for ParseMemberRoleError {}

impl FromStr for MemberRole {
    type Err = ParseMemberRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(MemberRole::Admin),
            "MEMBER" => Ok(MemberRole::Member),
            _ => Err(ParseMemberRoleError(s.to_string())),
        }
    }
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "ADMIN",
            MemberRole::Member => "MEMBER",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, MemberRole::Admin)
    }
}

/// Member record: binds a user to a workspace with a role.
#[derive(Clone, Debug)]
pub struct Member {
    pub id: MemberId,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a member.
#[derive(Clone, Debug)]
pub struct CreateMemberParams {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub role: MemberRole,
}
