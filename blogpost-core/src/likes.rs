//! The per-session liked-posts set.
//!
//! Tracks which posts the current user has liked so the client can decide
//! between like and unlike without asking the server. The set is persisted
//! across restarts and tagged with the user it belongs to, because a liked
//! set restored for one account must not leak into another.

use std::collections::BTreeSet;

use blogpost_types::{Post, PostId};
use serde::{Deserialize, Serialize};

/// Post ids the current user has liked, tagged with the owning user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedSet {
    /// Id of the user this set was recorded for. `None` on sets persisted
    /// before a login completed.
    #[serde(default)]
    owner: Option<String>,
    /// Liked post ids.
    #[serde(default)]
    ids: BTreeSet<PostId>,
}

impl LikedSet {
    /// Create an empty, unowned set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set owned by the given user.
    pub fn for_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            ids: BTreeSet::new(),
        }
    }

    /// Rebuild the set from server data: every post whose `likedBy` list
    /// contains the user's display name counts as liked.
    ///
    /// Display names are not unique, so this is a best-effort
    /// reconstruction; it matches what the backend exposes.
    pub fn rebuild(owner_id: impl Into<String>, owner_name: &str, posts: &[Post]) -> Self {
        let ids = posts
            .iter()
            .filter(|p| p.liked_by.iter().any(|n| n == owner_name))
            .map(|p| p.id.clone())
            .collect();
        Self {
            owner: Some(owner_id.into()),
            ids,
        }
    }

    /// The user this set belongs to, when known.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Whether this set was recorded for the given user.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner.as_deref() == Some(user_id)
    }

    /// Whether the post is in the set.
    pub fn contains(&self, id: &PostId) -> bool {
        self.ids.contains(id)
    }

    /// Add a post id. Returns false when it was already present.
    pub fn insert(&mut self, id: PostId) -> bool {
        self.ids.insert(id)
    }

    /// Remove a post id. Returns false when it was not present.
    pub fn remove(&mut self, id: &PostId) -> bool {
        self.ids.remove(id)
    }

    /// The liked ids, in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &PostId> {
        self.ids.iter()
    }

    /// Number of liked posts.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop everything, including the owner tag.
    pub fn clear(&mut self) {
        self.owner = None;
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_post(id: &str, liked_by: &[&str]) -> Post {
        Post {
            id: PostId::new(id),
            title: "t".into(),
            description: "d".into(),
            img_url: String::new(),
            owner_id: None,
            likes: liked_by.iter().map(|n| format!("marker-{}", n)).collect(),
            liked_by: liked_by.iter().map(|n| n.to_string()).collect(),
            comments: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn insert_and_remove_report_changes() {
        let mut set = LikedSet::for_owner("u-1");
        let id = PostId::new("a");

        assert!(set.insert(id.clone()));
        assert!(!set.insert(id.clone())); // Already present
        assert!(set.contains(&id));

        assert!(set.remove(&id));
        assert!(!set.remove(&id)); // Already gone
        assert!(set.is_empty());
    }

    #[test]
    fn rebuild_matches_liked_by_names() {
        let posts = vec![
            make_post("a", &["Ann", "Bob"]),
            make_post("b", &["Bob"]),
            make_post("c", &[]),
        ];

        let set = LikedSet::rebuild("u-ann", "Ann", &posts);
        assert!(set.is_owned_by("u-ann"));
        assert!(set.contains(&PostId::new("a")));
        assert!(!set.contains(&PostId::new("b")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ownership_checks() {
        let set = LikedSet::for_owner("u-1");
        assert!(set.is_owned_by("u-1"));
        assert!(!set.is_owned_by("u-2"));
        assert!(!LikedSet::new().is_owned_by("u-1"));
    }

    #[test]
    fn clear_drops_owner_and_ids() {
        let mut set = LikedSet::for_owner("u-1");
        set.insert(PostId::new("a"));

        set.clear();
        assert!(set.owner().is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn survives_serde_round_trip() {
        let mut set = LikedSet::for_owner("u-1");
        set.insert(PostId::new("b"));
        set.insert(PostId::new("a"));

        let json = serde_json::to_string(&set).unwrap();
        let restored: LikedSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, set);
    }

    #[test]
    fn deserializes_legacy_set_without_owner() {
        let restored: LikedSet = serde_json::from_str(r#"{"ids":["a","b"]}"#).unwrap();
        assert!(restored.owner().is_none());
        assert_eq!(restored.len(), 2);
    }
}
