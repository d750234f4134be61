//! Fan-out orchestrator — drives both delivery channels for every
//! audience-changing event.
//!
//! Invoked after the triggering record is durably committed. Live emission
//! and push dispatch run independently: live sends are synchronous
//! registry lookups, push dispatch is a detached task with its own error
//! boundary. A failure on either side is logged and swallowed; the
//! authoritative state is never affected by notification failure, and
//! nothing here is retried.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use newsflash_core::traits::DisplayNames;
use newsflash_core::types::id::UserId;
use newsflash_entity::comment::Comment;
use newsflash_entity::friend_request::FriendRequest;
use newsflash_entity::group::Group;
use newsflash_entity::notification::PushPayload;
use newsflash_entity::post::Post;
use newsflash_push::dispatcher::NotificationDispatcher;
use newsflash_push::formatter::NotificationFormatter;
use newsflash_realtime::connection::manager::ConnectionManager;
use newsflash_realtime::message::types::OutboundMessage;

use crate::audience::resolver::AudienceResolver;

/// Display name used when the actor's account cannot be read.
const FALLBACK_NAME: &str = "Someone";

/// Coordinates audience resolution and dual-channel delivery.
///
/// Holds explicit references to its collaborators and is itself injected
/// into whatever handles post/comment/friend-action creation; no component
/// reaches the live channel through ambient global state.
#[derive(Clone)]
pub struct FanoutOrchestrator {
    /// Audience resolver.
    resolver: AudienceResolver,
    /// Live delivery channel.
    live: Arc<ConnectionManager>,
    /// Push notification dispatcher.
    dispatcher: Arc<NotificationDispatcher>,
    /// Display-name lookup for notification text.
    names: Arc<dyn DisplayNames>,
}

impl std::fmt::Debug for FanoutOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutOrchestrator").finish()
    }
}

impl FanoutOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        resolver: AudienceResolver,
        live: Arc<ConnectionManager>,
        dispatcher: Arc<NotificationDispatcher>,
        names: Arc<dyn DisplayNames>,
    ) -> Self {
        Self {
            resolver,
            live,
            dispatcher,
            names,
        }
    }

    /// Fan-out for a newly created post.
    pub async fn on_post_created(&self, post: &Post) {
        let audience = match self
            .resolver
            .resolve(post.author_id, &post.recipient_ids, &post.group_ids)
            .await
        {
            Ok(audience) => audience,
            Err(e) => {
                error!(
                    post_id = %post.id,
                    error = %e,
                    "Audience resolution failed, skipping fan-out"
                );
                return;
            }
        };

        if audience.is_empty() {
            debug!(post_id = %post.id, "Post resolved to an empty audience");
            return;
        }

        let author_name = self.display_name(post.author_id).await;
        let payload = NotificationFormatter::post_created(
            &author_name,
            &post.content,
            post.id,
            post.author_id,
        );

        self.deliver(audience, payload);
    }

    /// Fan-out for a new comment: notifies the post's author and relays
    /// the event into the post's room for anyone viewing it live.
    pub async fn on_comment_created(&self, comment: &Comment, post_author_id: UserId) {
        let commenter_name = self.display_name(comment.author_id).await;
        let payload = NotificationFormatter::comment_created(
            &commenter_name,
            &comment.content,
            comment.post_id,
            comment.id,
            comment.author_id,
        );

        // Viewers of the post see the comment land regardless of whether
        // they are in the notification audience. The commenter is excluded.
        self.live.broadcast_to_room(
            comment.post_id,
            live_event(&payload),
            Some(comment.author_id),
        );

        // Commenting on your own post notifies no one.
        if comment.author_id == post_author_id {
            return;
        }

        self.deliver(HashSet::from([post_author_id]), payload);
    }

    /// Fan-out for a newly sent friend request.
    pub async fn on_friend_request_sent(&self, request: &FriendRequest) {
        let sender_name = self.display_name(request.sender_id).await;
        let payload =
            NotificationFormatter::friend_request(&sender_name, request.id, request.sender_id);

        self.deliver(HashSet::from([request.recipient_id]), payload);
    }

    /// Fan-out for an accepted friend request: the original sender learns
    /// their request was accepted.
    pub async fn on_friend_request_accepted(
        &self,
        acceptor_id: UserId,
        original_sender_id: UserId,
    ) {
        let acceptor_name = self.display_name(acceptor_id).await;
        let payload = NotificationFormatter::friend_accepted(&acceptor_name, acceptor_id);

        self.deliver(HashSet::from([original_sender_id]), payload);
    }

    /// Fan-out for a group invitation.
    pub async fn on_group_invitation_sent(
        &self,
        group: &Group,
        inviter_id: UserId,
        invitee_id: UserId,
    ) {
        let inviter_name = self.display_name(inviter_id).await;
        let payload = NotificationFormatter::group_invitation(
            &inviter_name,
            &group.name,
            group.id,
            inviter_id,
        );

        self.deliver(HashSet::from([invitee_id]), payload);
    }

    /// Drives both channels for a resolved recipient set.
    ///
    /// Live emission happens inline; it is only in-memory registry
    /// lookups and bounded try_sends. Push dispatch is detached so a slow
    /// or failing gateway can never stall the caller; the spawned task
    /// owns its failures and the dispatcher logs them.
    fn deliver(&self, recipients: HashSet<UserId>, payload: PushPayload) {
        let delivered_live = self.live.send_to_users(&recipients, &live_event(&payload));
        debug!(
            kind = payload.metadata.kind(),
            recipients = recipients.len(),
            delivered_live,
            "Live fan-out complete"
        );

        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            dispatcher.dispatch(&recipients, &payload).await;
        });
    }

    /// Looks up a display name, falling back to a placeholder. A missing
    /// or unreadable name degrades the notification text, never delivery.
    async fn display_name(&self, user_id: UserId) -> String {
        match self.names.display_name(user_id).await {
            Ok(Some(name)) => name,
            Ok(None) => FALLBACK_NAME.to_string(),
            Err(e) => {
                debug!(user_id = %user_id, error = %e, "Display name lookup failed");
                FALLBACK_NAME.to_string()
            }
        }
    }
}

/// Converts a push payload into the equivalent live event so both channels
/// agree on shape and deep-link ids.
fn live_event(payload: &PushPayload) -> OutboundMessage {
    OutboundMessage::Event {
        title: payload.title.clone(),
        body: payload.body.clone(),
        metadata: payload.metadata.clone(),
        badge: payload.badge,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use newsflash_core::config::RealtimeConfig;
    use newsflash_core::result::AppResult;
    use newsflash_core::traits::{FriendGraph, GroupDirectory, PushTokenStore};
    use newsflash_core::types::id::{FriendRequestId, GroupId, PostId};
    use newsflash_entity::notification::NotificationMetadata;
    use newsflash_push::gateway::{PushGateway, PushTicket, TicketStatus};
    use newsflash_realtime::presence::registry::PresenceRegistry;
    use newsflash_realtime::room::registry::RoomRegistry;

    struct FakeFriends {
        friends: HashMap<UserId, HashSet<UserId>>,
    }

    #[async_trait]
    impl FriendGraph for FakeFriends {
        async fn friend_ids(&self, user_id: UserId) -> AppResult<HashSet<UserId>> {
            Ok(self.friends.get(&user_id).cloned().unwrap_or_default())
        }
    }

    struct FakeGroups;

    #[async_trait]
    impl GroupDirectory for FakeGroups {
        async fn member_ids(&self, _group_id: GroupId) -> AppResult<HashSet<UserId>> {
            Ok(HashSet::new())
        }
    }

    struct FakeNames;

    #[async_trait]
    impl DisplayNames for FakeNames {
        async fn display_name(&self, _user_id: UserId) -> AppResult<Option<String>> {
            Ok(Some("amy".to_string()))
        }
    }

    #[derive(Default)]
    struct FakeTokenStore {
        /// Account → active tokens.
        tokens: HashMap<UserId, Vec<String>>,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl PushTokenStore for FakeTokenStore {
        async fn register(
            &self,
            _user_id: UserId,
            _token: &str,
            _device_id: Option<&str>,
            _platform: Option<&str>,
        ) -> AppResult<()> {
            Ok(())
        }

        async fn deactivate(&self, _user_id: UserId, _token: &str) -> AppResult<()> {
            Ok(())
        }

        async fn active_tokens_for(&self, user_ids: &[UserId]) -> AppResult<Vec<String>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(user_ids
                .iter()
                .flat_map(|id| self.tokens.get(id).cloned().unwrap_or_default())
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingGateway {
        sent: Mutex<Vec<(Vec<String>, PushPayload)>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PushGateway for RecordingGateway {
        async fn send_batch(
            &self,
            tokens: &[String],
            payload: &PushPayload,
        ) -> AppResult<Vec<PushTicket>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent
                .lock()
                .unwrap()
                .push((tokens.to_vec(), payload.clone()));
            Ok(tokens
                .iter()
                .map(|t| PushTicket {
                    token: t.clone(),
                    status: TicketStatus::Accepted,
                })
                .collect())
        }
    }

    struct Harness {
        orchestrator: FanoutOrchestrator,
        live: Arc<ConnectionManager>,
        store: Arc<FakeTokenStore>,
        gateway: Arc<RecordingGateway>,
    }

    fn harness(
        friends: HashMap<UserId, HashSet<UserId>>,
        tokens: HashMap<UserId, Vec<String>>,
    ) -> Harness {
        let live = Arc::new(ConnectionManager::new(
            RealtimeConfig::default(),
            Arc::new(PresenceRegistry::new()),
            Arc::new(RoomRegistry::new()),
        ));
        let store = Arc::new(FakeTokenStore {
            tokens,
            ..Default::default()
        });
        let gateway = Arc::new(RecordingGateway::default());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            gateway.clone(),
            100,
        ));
        let resolver = AudienceResolver::new(
            Arc::new(FakeFriends { friends }),
            Arc::new(FakeGroups),
        );
        let orchestrator =
            FanoutOrchestrator::new(resolver, live.clone(), dispatcher, Arc::new(FakeNames));

        Harness {
            orchestrator,
            live,
            store,
            gateway,
        }
    }

    /// Polls until the condition holds, failing after one second. The push
    /// side runs on a detached task, so tests wait for it to land.
    async fn wait_for(mut condition: impl FnMut() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not met within 1s");
    }

    fn post_by(author_id: UserId) -> Post {
        Post {
            id: PostId::new(),
            author_id,
            content: "big news".to_string(),
            image_url: None,
            recipient_ids: Vec::new(),
            group_ids: Vec::new(),
            sections: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_offline_friend_gets_exactly_one_push() {
        let author = UserId::new();
        let friend = UserId::new();

        let h = harness(
            HashMap::from([(author, HashSet::from([friend]))]),
            HashMap::from([(friend, vec!["friend-token".to_string()])]),
        );

        let post = post_by(author);
        h.orchestrator.on_post_created(&post).await;

        wait_for(|| h.gateway.calls.load(Ordering::SeqCst) >= 1).await;

        let sent = h.gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (tokens, payload) = &sent[0];
        assert_eq!(tokens, &vec!["friend-token".to_string()]);
        assert_eq!(
            payload.metadata,
            NotificationMetadata::Post {
                post_id: post.id,
                author_id: author,
            }
        );
    }

    #[tokio::test]
    async fn test_connected_recipient_gets_live_event_and_no_gateway_calls() {
        let sender = UserId::new();
        let recipient = UserId::new();

        // Recipient is connected live and has no push tokens.
        let h = harness(HashMap::new(), HashMap::new());
        let (_handle, mut rx) = h.live.register(recipient, "carla".to_string());

        let request = FriendRequest {
            id: FriendRequestId::new(),
            sender_id: sender,
            recipient_id: recipient,
            created_at: Utc::now(),
        };
        h.orchestrator.on_friend_request_sent(&request).await;

        match rx.recv().await {
            Some(OutboundMessage::Event { metadata, .. }) => {
                assert_eq!(
                    metadata,
                    NotificationMetadata::FriendRequest {
                        request_id: request.id,
                        sender_id: sender,
                    }
                );
            }
            other => panic!("expected live friend request event, got {other:?}"),
        }

        // The dispatcher ran, found no tokens, and never called the gateway.
        wait_for(|| h.store.lookups.load(Ordering::SeqCst) >= 1).await;
        assert_eq!(h.gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connected_author_receives_nothing() {
        let author = UserId::new();
        let friend = UserId::new();

        let h = harness(
            HashMap::from([(author, HashSet::from([friend]))]),
            HashMap::new(),
        );
        let (_author_handle, mut author_rx) = h.live.register(author, "amy".to_string());
        let (_friend_handle, mut friend_rx) = h.live.register(friend, "bob".to_string());

        h.orchestrator.on_post_created(&post_by(author)).await;

        assert!(matches!(
            friend_rx.recv().await,
            Some(OutboundMessage::Event { .. })
        ));
        assert!(author_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_own_comment_notifies_no_one() {
        let author = UserId::new();

        let h = harness(HashMap::new(), HashMap::new());
        let (_handle, mut rx) = h.live.register(author, "amy".to_string());

        let comment = Comment {
            id: newsflash_core::types::id::CommentId::new(),
            post_id: PostId::new(),
            author_id: author,
            content: "replying to myself".to_string(),
            created_at: Utc::now(),
        };
        h.orchestrator.on_comment_created(&comment, author).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(h.gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_comment_relayed_to_post_room_viewers() {
        let post_author = UserId::new();
        let commenter = UserId::new();
        let viewer = UserId::new();
        let post_id = PostId::new();

        let h = harness(HashMap::new(), HashMap::new());
        let (viewer_handle, mut viewer_rx) = h.live.register(viewer, "vic".to_string());
        h.live.handle_inbound(
            &viewer_handle.id,
            &serde_json::json!({"type": "join_post", "post_id": post_id}).to_string(),
        );
        assert!(matches!(
            viewer_rx.recv().await,
            Some(OutboundMessage::Joined { .. })
        ));

        let comment = Comment {
            id: newsflash_core::types::id::CommentId::new(),
            post_id,
            author_id: commenter,
            content: "live reaction".to_string(),
            created_at: Utc::now(),
        };
        h.orchestrator
            .on_comment_created(&comment, post_author)
            .await;

        match viewer_rx.recv().await {
            Some(OutboundMessage::Event { metadata, .. }) => {
                assert_eq!(metadata.kind(), "comment");
            }
            other => panic!("expected comment event in room, got {other:?}"),
        }
    }
}
