//! Newsflash post model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use newsflash_core::types::id::{GroupId, PostId, UserId};

/// A newsflash post as seen by the fan-out engine.
///
/// The audience fields are immutable once the post is created; edits
/// change content and image only, never recipients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: PostId,
    /// The authoring account.
    pub author_id: UserId,
    /// Post body text.
    pub content: String,
    /// Optional image reference.
    pub image_url: Option<String>,
    /// Accounts explicitly addressed by the author.
    #[sqlx(json)]
    pub recipient_ids: Vec<UserId>,
    /// Groups addressed by the author.
    #[sqlx(json)]
    pub group_ids: Vec<GroupId>,
    /// Public section tags.
    #[sqlx(json)]
    pub sections: Vec<String>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
}
