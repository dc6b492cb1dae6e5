//! Post collection cache.
//!
//! This module owns the client's in-memory copy of the post collection:
//! an ordered list with unique ids, in server order. Every method here is
//! synchronous state surgery; the async client layer decides when to call
//! them and how to undo them when the server disagrees.

use blogpost_types::{Comment, Post, PostId, PostUpdate};

/// The authoritative local copy of the post collection.
///
/// Order is whatever the server returned on the last wholesale refresh,
/// with confirmed creations prepended. Ids are unique; when input
/// contains duplicates the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct PostCatalog {
    posts: Vec<Post>,
}

impl PostCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self { posts: Vec::new() }
    }

    /// Replace the whole collection with a fresh server listing.
    ///
    /// Duplicate ids in the input are dropped (first occurrence wins), so
    /// the unique-id invariant holds even against a misbehaving backend.
    pub fn replace_all(&mut self, posts: Vec<Post>) {
        self.posts.clear();
        for post in posts {
            if !self.contains(&post.id) {
                self.posts.push(post);
            }
        }
    }

    /// All posts, in collection order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Look up a post by id.
    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|p| &p.id == id)
    }

    /// Whether a post with this id is in the catalog.
    pub fn contains(&self, id: &PostId) -> bool {
        self.posts.iter().any(|p| &p.id == id)
    }

    /// Number of posts in the catalog.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Insert a confirmed new post at the front of the collection.
    ///
    /// If the id already exists the stored post is replaced in place
    /// instead, preserving its position.
    pub fn prepend(&mut self, post: Post) {
        if let Some(existing) = self.posts.iter_mut().find(|p| p.id == post.id) {
            *existing = post;
        } else {
            self.posts.insert(0, post);
        }
    }

    /// Remove a post, returning it for possible restoration.
    pub fn remove(&mut self, id: &PostId) -> Option<Post> {
        let index = self.posts.iter().position(|p| &p.id == id)?;
        Some(self.posts.remove(index))
    }

    /// Merge an edit's fields into the stored post.
    ///
    /// Returns false when the id is unknown.
    pub fn apply_update(&mut self, id: &PostId, update: &PostUpdate) -> bool {
        match self.posts.iter_mut().find(|p| &p.id == id) {
            Some(post) => {
                post.title = update.title.clone();
                post.description = update.description.clone();
                post.img_url = update.img_url.clone();
                true
            }
            None => false,
        }
    }

    /// Replace a stored post with a server-authoritative version, keeping
    /// its position. Returns false when the id is unknown.
    pub fn replace(&mut self, post: Post) -> bool {
        match self.posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => {
                *existing = post;
                true
            }
            None => false,
        }
    }

    /// Record a like: push the caller's marker and display name.
    ///
    /// Returns false when the id is unknown.
    pub fn add_like(&mut self, id: &PostId, marker: &str, name: &str) -> bool {
        match self.posts.iter_mut().find(|p| &p.id == id) {
            Some(post) => {
                post.likes.push(marker.to_owned());
                post.liked_by.push(name.to_owned());
                true
            }
            None => false,
        }
    }

    /// Remove a like previously recorded with [`add_like`].
    ///
    /// Removes the first marker equal to `marker`, falling back to the
    /// most recent marker when the backend rewrote them, and the first
    /// `likedBy` entry equal to `name`. Returns false when the id is
    /// unknown.
    ///
    /// [`add_like`]: PostCatalog::add_like
    pub fn remove_like(&mut self, id: &PostId, marker: &str, name: &str) -> bool {
        match self.posts.iter_mut().find(|p| &p.id == id) {
            Some(post) => {
                match post.likes.iter().position(|m| m == marker) {
                    Some(index) => {
                        post.likes.remove(index);
                    }
                    None => {
                        post.likes.pop();
                    }
                }
                if let Some(index) = post.liked_by.iter().position(|n| n == name) {
                    post.liked_by.remove(index);
                }
                true
            }
            None => false,
        }
    }

    /// Append a comment to a post's thread.
    ///
    /// Returns false when the id is unknown.
    pub fn push_comment(&mut self, id: &PostId, comment: Comment) -> bool {
        match self.posts.iter_mut().find(|p| &p.id == id) {
            Some(post) => {
                post.comments.push(comment);
                true
            }
            None => false,
        }
    }

    /// Remove the most recent occurrence of a provisional comment.
    ///
    /// Used as the precise inverse of an optimistic append. Returns false
    /// when the id is unknown or the comment is no longer in the thread.
    pub fn retract_comment(&mut self, id: &PostId, comment: &Comment) -> bool {
        match self.posts.iter_mut().find(|p| &p.id == id) {
            Some(post) => match post.comments.iter().rposition(|c| c == comment) {
                Some(index) => {
                    post.comments.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Replace a post's whole comment thread with a server listing.
    ///
    /// Returns false when the id is unknown.
    pub fn set_comments(&mut self, id: &PostId, comments: Vec<Comment>) -> bool {
        match self.posts.iter_mut().find(|p| &p.id == id) {
            Some(post) => {
                post.comments = comments;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_post(id: &str, title: &str) -> Post {
        Post {
            id: PostId::new(id),
            title: title.to_owned(),
            description: format!("{} body", title),
            img_url: String::new(),
            owner_id: Some("u-1".to_owned()),
            likes: Vec::new(),
            liked_by: Vec::new(),
            comments: Vec::new(),
            created_at: None,
        }
    }

    fn make_comment(text: &str, user: &str) -> Comment {
        Comment {
            text: text.to_owned(),
            user: user.to_owned(),
            created_at: None,
        }
    }

    // ======== Replacement and lookup ========

    #[test]
    fn replace_all_keeps_server_order() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("b", "B"), make_post("a", "A")]);

        let titles: Vec<_> = catalog.posts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn replace_all_drops_duplicate_ids() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![
            make_post("a", "First"),
            make_post("a", "Duplicate"),
            make_post("b", "B"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&PostId::new("a")).unwrap().title, "First");
    }

    #[test]
    fn replace_all_discards_previous_contents() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("old", "Old")]);
        catalog.replace_all(vec![make_post("new", "New")]);

        assert!(!catalog.contains(&PostId::new("old")));
        assert!(catalog.contains(&PostId::new("new")));
    }

    #[test]
    fn get_unknown_id_is_none() {
        let catalog = PostCatalog::new();
        assert!(catalog.get(&PostId::new("nope")).is_none());
        assert!(catalog.is_empty());
    }

    // ======== Insert / remove / edit ========

    #[test]
    fn prepend_puts_new_post_first() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("a", "A")]);
        catalog.prepend(make_post("b", "B"));

        assert_eq!(catalog.posts()[0].id, PostId::new("b"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn prepend_existing_id_replaces_in_place() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("a", "A"), make_post("b", "B")]);
        catalog.prepend(make_post("b", "B updated"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.posts()[1].title, "B updated");
    }

    #[test]
    fn remove_returns_the_post() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("a", "A"), make_post("b", "B")]);

        let removed = catalog.remove(&PostId::new("a")).unwrap();
        assert_eq!(removed.title, "A");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.remove(&PostId::new("a")).is_none());
    }

    #[test]
    fn apply_update_merges_fields() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("a", "A")]);

        let update = PostUpdate {
            title: "New title".into(),
            description: "New body".into(),
            img_url: "https://img.example/new.png".into(),
        };
        assert!(catalog.apply_update(&PostId::new("a"), &update));

        let post = catalog.get(&PostId::new("a")).unwrap();
        assert_eq!(post.title, "New title");
        assert_eq!(post.description, "New body");
        assert_eq!(post.img_url, "https://img.example/new.png");
        // Untouched fields survive the merge
        assert_eq!(post.owner_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn apply_update_unknown_id_is_false() {
        let mut catalog = PostCatalog::new();
        let update = PostUpdate {
            title: "t".into(),
            description: "d".into(),
            img_url: String::new(),
        };
        assert!(!catalog.apply_update(&PostId::new("missing"), &update));
    }

    #[test]
    fn replace_keeps_position() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("a", "A"), make_post("b", "B")]);

        let mut authoritative = make_post("b", "B from server");
        authoritative.likes.push("m1".into());
        assert!(catalog.replace(authoritative));

        assert_eq!(catalog.posts()[1].title, "B from server");
        assert_eq!(catalog.posts()[1].like_count(), 1);
    }

    // ======== Likes ========

    #[test]
    fn add_like_then_remove_like_restores_arrays() {
        let mut catalog = PostCatalog::new();
        let mut post = make_post("a", "A");
        post.likes = vec!["other".into()];
        post.liked_by = vec!["Bob".into()];
        catalog.replace_all(vec![post]);
        let id = PostId::new("a");

        assert!(catalog.add_like(&id, "u-9", "Ann"));
        {
            let post = catalog.get(&id).unwrap();
            assert_eq!(post.likes, vec!["other", "u-9"]);
            assert_eq!(post.liked_by, vec!["Bob", "Ann"]);
        }

        assert!(catalog.remove_like(&id, "u-9", "Ann"));
        let post = catalog.get(&id).unwrap();
        assert_eq!(post.likes, vec!["other"]);
        assert_eq!(post.liked_by, vec!["Bob"]);
    }

    #[test]
    fn remove_like_falls_back_to_most_recent_marker() {
        let mut catalog = PostCatalog::new();
        let mut post = make_post("a", "A");
        post.likes = vec!["x".into(), "y".into()];
        post.liked_by = vec!["Ann".into()];
        catalog.replace_all(vec![post]);
        let id = PostId::new("a");

        // Marker "u-9" is not present; the most recent one goes instead.
        assert!(catalog.remove_like(&id, "u-9", "Ann"));
        let post = catalog.get(&id).unwrap();
        assert_eq!(post.likes, vec!["x"]);
        assert!(post.liked_by.is_empty());
    }

    #[test]
    fn like_ops_on_unknown_id_are_false() {
        let mut catalog = PostCatalog::new();
        let id = PostId::new("missing");
        assert!(!catalog.add_like(&id, "m", "n"));
        assert!(!catalog.remove_like(&id, "m", "n"));
    }

    // ======== Comments ========

    #[test]
    fn push_and_retract_comment() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("a", "A")]);
        let id = PostId::new("a");
        let provisional = make_comment("first!", "You");

        assert!(catalog.push_comment(&id, provisional.clone()));
        assert_eq!(catalog.get(&id).unwrap().comments.len(), 1);

        assert!(catalog.retract_comment(&id, &provisional));
        assert!(catalog.get(&id).unwrap().comments.is_empty());
        assert!(!catalog.retract_comment(&id, &provisional));
    }

    #[test]
    fn retract_comment_removes_most_recent_match() {
        let mut catalog = PostCatalog::new();
        catalog.replace_all(vec![make_post("a", "A")]);
        let id = PostId::new("a");
        let dup = make_comment("same", "You");

        catalog.push_comment(&id, make_comment("same", "Bob"));
        catalog.push_comment(&id, dup.clone());
        assert!(catalog.retract_comment(&id, &dup));

        let comments = &catalog.get(&id).unwrap().comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user, "Bob");
    }

    #[test]
    fn set_comments_replaces_thread_verbatim() {
        let mut catalog = PostCatalog::new();
        let mut post = make_post("a", "A");
        post.comments = vec![make_comment("local", "You")];
        catalog.replace_all(vec![post]);
        let id = PostId::new("a");

        let server_thread = vec![
            make_comment("first", "Ann"),
            make_comment("second", "Bob"),
        ];
        assert!(catalog.set_comments(&id, server_thread.clone()));
        assert_eq!(catalog.get(&id).unwrap().comments, server_thread);
    }

    #[test]
    fn comment_ops_on_unknown_id_are_false() {
        let mut catalog = PostCatalog::new();
        let id = PostId::new("missing");
        assert!(!catalog.push_comment(&id, make_comment("t", "u")));
        assert!(!catalog.set_comments(&id, Vec::new()));
    }
}
