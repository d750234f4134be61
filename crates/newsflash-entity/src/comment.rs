//! Comment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use newsflash_core::types::id::{CommentId, PostId, UserId};

/// A comment on a newsflash post, as seen by the fan-out engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// The commented post.
    pub post_id: PostId,
    /// The commenting account.
    pub author_id: UserId,
    /// Comment body text.
    pub content: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}
