//! Audience resolver — determines exactly which accounts receive a post.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use newsflash_core::result::AppResult;
use newsflash_core::traits::{FriendGraph, GroupDirectory};
use newsflash_core::types::id::{GroupId, UserId};

/// Resolves a post's declared audience into a concrete recipient set.
///
/// Pure with respect to delivery: reads the social graph, produces a set,
/// no side effects. Group membership is expanded at call time, no caching.
#[derive(Clone)]
pub struct AudienceResolver {
    /// Friendship graph reader.
    friends: Arc<dyn FriendGraph>,
    /// Group membership reader.
    groups: Arc<dyn GroupDirectory>,
}

impl std::fmt::Debug for AudienceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudienceResolver").finish()
    }
}

impl AudienceResolver {
    /// Creates a new audience resolver.
    pub fn new(friends: Arc<dyn FriendGraph>, groups: Arc<dyn GroupDirectory>) -> Self {
        Self { friends, groups }
    }

    /// Resolves the recipient set for a post.
    ///
    /// The result is the union of the direct recipients and the expanded
    /// group members, minus the author. When both lists are empty the post
    /// goes to the author's full friend list instead — the "notify all
    /// friends when no explicit audience chosen" policy.
    ///
    /// A group id that no longer resolves contributes no members; it is
    /// logged but deliberately not an error, so a deleted group never
    /// blocks delivery to the rest of the audience.
    pub async fn resolve(
        &self,
        author_id: UserId,
        direct_recipient_ids: &[UserId],
        group_ids: &[GroupId],
    ) -> AppResult<HashSet<UserId>> {
        let mut audience: HashSet<UserId> = direct_recipient_ids.iter().copied().collect();

        for group_id in group_ids {
            let members = self.groups.member_ids(*group_id).await?;
            if members.is_empty() {
                warn!(group_id = %group_id, "Audience group expanded to no members");
            }
            audience.extend(members);
        }

        if direct_recipient_ids.is_empty() && group_ids.is_empty() {
            audience.extend(self.friends.friend_ids(author_id).await?);
        }

        audience.remove(&author_id);
        Ok(audience)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;

    struct FakeFriends {
        friends: HashMap<UserId, HashSet<UserId>>,
    }

    #[async_trait]
    impl FriendGraph for FakeFriends {
        async fn friend_ids(&self, user_id: UserId) -> AppResult<HashSet<UserId>> {
            Ok(self.friends.get(&user_id).cloned().unwrap_or_default())
        }
    }

    struct FakeGroups {
        members: HashMap<GroupId, HashSet<UserId>>,
    }

    #[async_trait]
    impl GroupDirectory for FakeGroups {
        async fn member_ids(&self, group_id: GroupId) -> AppResult<HashSet<UserId>> {
            Ok(self.members.get(&group_id).cloned().unwrap_or_default())
        }
    }

    fn resolver(
        friends: HashMap<UserId, HashSet<UserId>>,
        members: HashMap<GroupId, HashSet<UserId>>,
    ) -> AudienceResolver {
        AudienceResolver::new(
            Arc::new(FakeFriends { friends }),
            Arc::new(FakeGroups { members }),
        )
    }

    #[tokio::test]
    async fn test_union_of_direct_and_group_members_minus_author() {
        let author = UserId::new();
        let direct = UserId::new();
        let member_a = UserId::new();
        let member_b = UserId::new();
        let group = GroupId::new();

        let resolver = resolver(
            HashMap::new(),
            HashMap::from([(
                group,
                // The author is also a group member and must be excluded.
                HashSet::from([member_a, member_b, author]),
            )]),
        );

        let audience = resolver
            .resolve(author, &[direct], &[group])
            .await
            .expect("resolve");

        assert_eq!(audience, HashSet::from([direct, member_a, member_b]));
    }

    #[tokio::test]
    async fn test_overlapping_direct_and_group_deduplicated() {
        let author = UserId::new();
        let shared = UserId::new();
        let group = GroupId::new();

        let resolver = resolver(
            HashMap::new(),
            HashMap::from([(group, HashSet::from([shared]))]),
        );

        let audience = resolver
            .resolve(author, &[shared], &[group])
            .await
            .expect("resolve");

        assert_eq!(audience.len(), 1);
        assert!(audience.contains(&shared));
    }

    #[tokio::test]
    async fn test_empty_audience_falls_back_to_friends() {
        let author = UserId::new();
        let friend_a = UserId::new();
        let friend_b = UserId::new();

        let resolver = resolver(
            HashMap::from([(author, HashSet::from([friend_a, friend_b]))]),
            HashMap::new(),
        );

        let audience = resolver.resolve(author, &[], &[]).await.expect("resolve");
        assert_eq!(audience, HashSet::from([friend_a, friend_b]));
    }

    #[tokio::test]
    async fn test_explicit_audience_skips_friend_fallback() {
        let author = UserId::new();
        let friend = UserId::new();
        let direct = UserId::new();

        let resolver = resolver(
            HashMap::from([(author, HashSet::from([friend]))]),
            HashMap::new(),
        );

        let audience = resolver
            .resolve(author, &[direct], &[])
            .await
            .expect("resolve");

        assert_eq!(audience, HashSet::from([direct]));
    }

    #[tokio::test]
    async fn test_unknown_group_contributes_nothing() {
        let author = UserId::new();
        let direct = UserId::new();

        let resolver = resolver(HashMap::new(), HashMap::new());

        let audience = resolver
            .resolve(author, &[direct], &[GroupId::new()])
            .await
            .expect("resolve");

        assert_eq!(audience, HashSet::from([direct]));
    }

    #[tokio::test]
    async fn test_author_never_in_audience() {
        let author = UserId::new();

        let resolver = resolver(
            // Degenerate self-friendship must still be excluded.
            HashMap::from([(author, HashSet::from([author]))]),
            HashMap::new(),
        );

        let audience = resolver
            .resolve(author, &[author], &[])
            .await
            .expect("resolve");
        assert!(audience.is_empty());

        let fallback = resolver.resolve(author, &[], &[]).await.expect("resolve");
        assert!(fallback.is_empty());
    }
}
