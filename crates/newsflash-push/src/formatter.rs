//! Notification payload construction for each event kind.

use newsflash_core::types::id::{CommentId, FriendRequestId, GroupId, PostId, UserId};
use newsflash_entity::notification::{NotificationMetadata, PushPayload};

/// Maximum characters of body text shown in a notification.
pub const BODY_CHAR_LIMIT: usize = 100;

/// Truncates body text to the display limit, appending an ellipsis when
/// anything was cut. Operates on characters, not bytes.
pub fn truncate_body(body: &str) -> String {
    if body.chars().count() <= BODY_CHAR_LIMIT {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(BODY_CHAR_LIMIT).collect();
    truncated.push('…');
    truncated
}

/// Builds notification payloads for the fan-out event kinds.
pub struct NotificationFormatter;

impl NotificationFormatter {
    /// A new post shared with the recipient.
    pub fn post_created(
        author_name: &str,
        content: &str,
        post_id: PostId,
        author_id: UserId,
    ) -> PushPayload {
        PushPayload {
            title: format!("{author_name} shared a newsflash"),
            body: truncate_body(content),
            metadata: NotificationMetadata::Post { post_id, author_id },
            badge: 1,
        }
    }

    /// A comment on the recipient's post.
    pub fn comment_created(
        author_name: &str,
        comment_text: &str,
        post_id: PostId,
        comment_id: CommentId,
        author_id: UserId,
    ) -> PushPayload {
        PushPayload {
            title: format!("{author_name} commented on your newsflash"),
            body: truncate_body(comment_text),
            metadata: NotificationMetadata::Comment {
                post_id,
                comment_id,
                author_id,
            },
            badge: 1,
        }
    }

    /// A new friend request for the recipient.
    pub fn friend_request(
        sender_name: &str,
        request_id: FriendRequestId,
        sender_id: UserId,
    ) -> PushPayload {
        PushPayload {
            title: "New friend request".to_string(),
            body: format!("{sender_name} wants to be your friend"),
            metadata: NotificationMetadata::FriendRequest {
                request_id,
                sender_id,
            },
            badge: 1,
        }
    }

    /// The recipient's friend request was accepted.
    pub fn friend_accepted(acceptor_name: &str, acceptor_id: UserId) -> PushPayload {
        PushPayload {
            title: "Friend request accepted".to_string(),
            body: format!("{acceptor_name} accepted your friend request"),
            metadata: NotificationMetadata::FriendAccepted { acceptor_id },
            badge: 1,
        }
    }

    /// The recipient was invited to a group.
    pub fn group_invitation(
        inviter_name: &str,
        group_name: &str,
        group_id: GroupId,
        inviter_id: UserId,
    ) -> PushPayload {
        PushPayload {
            title: "Group invitation".to_string(),
            body: format!("{inviter_name} invited you to {group_name}"),
            metadata: NotificationMetadata::GroupInvitation {
                group_id,
                inviter_id,
            },
            badge: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_body_truncated_with_ellipsis() {
        let body = "x".repeat(250);
        let truncated = truncate_body(&body);

        assert_eq!(truncated.chars().count(), BODY_CHAR_LIMIT + 1);
        assert!(truncated.ends_with('…'));
        assert!(truncated.starts_with(&"x".repeat(BODY_CHAR_LIMIT)));
    }

    #[test]
    fn test_body_at_limit_unchanged() {
        let body = "y".repeat(BODY_CHAR_LIMIT);
        assert_eq!(truncate_body(&body), body);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let body = "ß".repeat(150);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), BODY_CHAR_LIMIT + 1);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_post_payload_body_truncated() {
        let content = "a".repeat(250);
        let payload = NotificationFormatter::post_created(
            "amy",
            &content,
            PostId::new(),
            UserId::new(),
        );

        assert_eq!(payload.body.chars().count(), BODY_CHAR_LIMIT + 1);
        assert_eq!(payload.metadata.kind(), "post");
        assert_eq!(payload.title, "amy shared a newsflash");
    }

    #[test]
    fn test_friend_request_payload() {
        let sender = UserId::new();
        let request = FriendRequestId::new();
        let payload = NotificationFormatter::friend_request("bob", request, sender);

        assert_eq!(payload.metadata.kind(), "friend_request");
        assert_eq!(payload.body, "bob wants to be your friend");
    }
}
