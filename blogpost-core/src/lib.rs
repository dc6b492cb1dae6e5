//! # blogpost-core
//!
//! Pure state logic for the blogpost client (no I/O, instant tests).
//!
//! This crate implements the client's local state without any network or
//! disk access:
//! - [`PostCatalog`] - the in-memory post collection
//! - [`LikedSet`] - the per-session liked-posts set
//! - [`PendingMutations`] - the per-post in-flight mutation guard
//!
//! All modules here are **pure**: methods mutate owned state and return
//! values, nothing else. The async `blogpost-client` crate decides when to
//! call them, what to send over the wire, and how to undo optimistic
//! changes the server refuses.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod likes;
pub mod mutation;

pub use catalog::PostCatalog;
pub use likes::LikedSet;
pub use mutation::{MutationKind, PendingError, PendingMutations};
