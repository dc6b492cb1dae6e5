//! Per-post pending-mutation guard.
//!
//! The client applies mutations optimistically, so two in-flight mutations
//! against the same post would fight over the same cache entry and leave
//! the revert path ambiguous. This module tracks which posts have a
//! mutation outstanding and rejects a second one until the first settles.
//!
//! Creation is not guarded: a new post has no id until the server answers.

use std::collections::HashMap;

use blogpost_types::PostId;

/// The kinds of mutation that can be in flight against an existing post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// `DELETE /post/:id`
    Delete,
    /// `PUT /post/:id`
    Edit,
    /// `POST /post/like/:id`
    Like,
    /// `DELETE /post/like/:id`
    Unlike,
    /// `POST /post/comment/:id`
    Comment,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            MutationKind::Delete => "delete",
            MutationKind::Edit => "edit",
            MutationKind::Like => "like",
            MutationKind::Unlike => "unlike",
            MutationKind::Comment => "comment",
        };
        write!(f, "{}", verb)
    }
}

/// Error type for the pending guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingError {
    /// The post already has a mutation outstanding.
    Busy {
        /// The contested post.
        post: PostId,
        /// What is already in flight.
        in_flight: MutationKind,
    },
}

impl std::fmt::Display for PendingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingError::Busy { post, in_flight } => {
                write!(f, "post {} has a {} in flight", post, in_flight)
            }
        }
    }
}

impl std::error::Error for PendingError {}

/// Tracks which posts have a mutation in flight.
///
/// Lifecycle per mutation: `begin()` before the optimistic cache change,
/// `finish()` after the mutation settles (confirmed or reverted). A begin
/// against a busy post fails without touching anything.
#[derive(Debug, Default)]
pub struct PendingMutations {
    in_flight: HashMap<PostId, MutationKind>,
}

impl PendingMutations {
    /// Create an empty guard.
    pub fn new() -> Self {
        Self {
            in_flight: HashMap::new(),
        }
    }

    /// Claim a post for a mutation.
    ///
    /// Fails when the post already has one outstanding, reporting what is
    /// in flight.
    pub fn begin(&mut self, id: &PostId, kind: MutationKind) -> Result<(), PendingError> {
        if let Some(existing) = self.in_flight.get(id) {
            return Err(PendingError::Busy {
                post: id.clone(),
                in_flight: *existing,
            });
        }
        self.in_flight.insert(id.clone(), kind);
        Ok(())
    }

    /// Release a post after its mutation settled.
    ///
    /// Releasing a post with nothing in flight is a no-op.
    pub fn finish(&mut self, id: &PostId) {
        self.in_flight.remove(id);
    }

    /// Whether the post has a mutation outstanding.
    pub fn is_pending(&self, id: &PostId) -> bool {
        self.in_flight.contains_key(id)
    }

    /// What is in flight for the post, if anything.
    pub fn kind(&self, id: &PostId) -> Option<MutationKind> {
        self.in_flight.get(id).copied()
    }

    /// Number of posts with a mutation outstanding.
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Drop all claims. Used when the whole session is torn down.
    pub fn clear(&mut self) {
        self.in_flight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_claims_and_finish_releases() {
        let mut pending = PendingMutations::new();
        let id = PostId::new("a");

        pending.begin(&id, MutationKind::Like).unwrap();
        assert!(pending.is_pending(&id));
        assert_eq!(pending.kind(&id), Some(MutationKind::Like));

        pending.finish(&id);
        assert!(!pending.is_pending(&id));
        assert!(pending.is_empty());
    }

    #[test]
    fn second_begin_on_same_post_is_rejected() {
        let mut pending = PendingMutations::new();
        let id = PostId::new("a");

        pending.begin(&id, MutationKind::Edit).unwrap();
        let err = pending.begin(&id, MutationKind::Delete).unwrap_err();

        assert_eq!(
            err,
            PendingError::Busy {
                post: id.clone(),
                in_flight: MutationKind::Edit,
            }
        );
        // The original claim is untouched
        assert_eq!(pending.kind(&id), Some(MutationKind::Edit));
    }

    #[test]
    fn different_posts_do_not_contend() {
        let mut pending = PendingMutations::new();

        pending.begin(&PostId::new("a"), MutationKind::Like).unwrap();
        pending.begin(&PostId::new("b"), MutationKind::Delete).unwrap();

        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn finish_without_begin_is_no_op() {
        let mut pending = PendingMutations::new();
        pending.finish(&PostId::new("a"));
        assert!(pending.is_empty());
    }

    #[test]
    fn begin_after_finish_succeeds() {
        let mut pending = PendingMutations::new();
        let id = PostId::new("a");

        pending.begin(&id, MutationKind::Like).unwrap();
        pending.finish(&id);
        pending.begin(&id, MutationKind::Unlike).unwrap();

        assert_eq!(pending.kind(&id), Some(MutationKind::Unlike));
    }

    #[test]
    fn busy_error_names_the_in_flight_kind() {
        let err = PendingError::Busy {
            post: PostId::new("a"),
            in_flight: MutationKind::Comment,
        };
        assert_eq!(err.to_string(), "post a has a comment in flight");
    }

    #[test]
    fn clear_releases_everything() {
        let mut pending = PendingMutations::new();
        pending.begin(&PostId::new("a"), MutationKind::Like).unwrap();
        pending.begin(&PostId::new("b"), MutationKind::Edit).unwrap();

        pending.clear();
        assert!(pending.is_empty());
    }
}
