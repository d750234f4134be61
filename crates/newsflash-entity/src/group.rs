//! Group membership model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use newsflash_core::types::id::{GroupId, UserId};

/// Role of a member within a group. The owning store guarantees every
/// group keeps at least one admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "group_role", rename_all = "snake_case")]
pub enum GroupRole {
    /// Group administrator.
    Admin,
    /// Regular member.
    Member,
}

/// A single group membership row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    /// The group.
    pub group_id: GroupId,
    /// The member account.
    pub user_id: UserId,
    /// The member's role.
    pub role: GroupRole,
}

/// A group, as seen by the fan-out engine: an id and the name shown in
/// invitation text. The full group record lives in the CRUD layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
}
