//! Strongly-typed identifiers (avoid mixing strings/UUIDs arbitrarily).

use uuid::Uuid;

/// User identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

/// Workspace identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkspaceId(pub Uuid);

/// Member identifier (a user's membership in one workspace).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberId(pub Uuid);

/// Project identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProjectId(pub Uuid);

/// Task identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub Uuid);
