//! Notification payload types shared by both delivery channels.
//!
//! The live channel and the push gateway carry the same payload shape so
//! a client can deep-link identically regardless of which channel the
//! event arrived on. Payloads are fire-and-forget and never persisted.

use serde::{Deserialize, Serialize};

use newsflash_core::types::id::{CommentId, FriendRequestId, GroupId, PostId, UserId};

/// Kind-discriminated deep-link metadata attached to every notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationMetadata {
    /// A new post was shared with the recipient.
    Post {
        /// The post to open.
        post_id: PostId,
        /// The post's author.
        author_id: UserId,
    },
    /// Someone commented on the recipient's post.
    Comment {
        /// The commented post.
        post_id: PostId,
        /// The comment itself.
        comment_id: CommentId,
        /// The commenter.
        author_id: UserId,
    },
    /// The recipient received a friend request.
    FriendRequest {
        /// The pending request.
        request_id: FriendRequestId,
        /// The account that sent it.
        sender_id: UserId,
    },
    /// A friend request the recipient sent was accepted.
    FriendAccepted {
        /// The account that accepted.
        acceptor_id: UserId,
    },
    /// The recipient was invited to a group.
    GroupInvitation {
        /// The group.
        group_id: GroupId,
        /// The inviting account.
        inviter_id: UserId,
    },
}

impl NotificationMetadata {
    /// The wire value of the `type` discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Post { .. } => "post",
            Self::Comment { .. } => "comment",
            Self::FriendRequest { .. } => "friend_request",
            Self::FriendAccepted { .. } => "friend_accepted",
            Self::GroupInvitation { .. } => "group_invitation",
        }
    }
}

/// A notification as handed to the push gateway and the live channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    /// Notification title.
    pub title: String,
    /// Notification body, already truncated to the display limit.
    pub body: String,
    /// Deep-link metadata.
    pub metadata: NotificationMetadata,
    /// Badge count for the client app icon.
    pub badge: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_wire_shape() {
        let author = UserId::new();
        let post = PostId::new();
        let metadata = NotificationMetadata::Post {
            post_id: post,
            author_id: author,
        };

        let value = serde_json::to_value(&metadata).expect("serialize");
        assert_eq!(value["type"], "post");
        assert_eq!(value["post_id"], serde_json::json!(post));
        assert_eq!(value["author_id"], serde_json::json!(author));
    }

    #[test]
    fn test_metadata_kind_matches_tag() {
        let cases = [
            (
                NotificationMetadata::Post {
                    post_id: PostId::new(),
                    author_id: UserId::new(),
                },
                "post",
            ),
            (
                NotificationMetadata::Comment {
                    post_id: PostId::new(),
                    comment_id: CommentId::new(),
                    author_id: UserId::new(),
                },
                "comment",
            ),
            (
                NotificationMetadata::FriendRequest {
                    request_id: FriendRequestId::new(),
                    sender_id: UserId::new(),
                },
                "friend_request",
            ),
            (
                NotificationMetadata::FriendAccepted {
                    acceptor_id: UserId::new(),
                },
                "friend_accepted",
            ),
            (
                NotificationMetadata::GroupInvitation {
                    group_id: GroupId::new(),
                    inviter_id: UserId::new(),
                },
                "group_invitation",
            ),
        ];

        for (metadata, expected) in cases {
            assert_eq!(metadata.kind(), expected);
            let value = serde_json::to_value(&metadata).expect("serialize");
            assert_eq!(value["type"], expected);
        }
    }
}
