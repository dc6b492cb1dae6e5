//! Data model for the Blog-Post API.
//!
//! These structs mirror the JSON documents the backend serves. The backend
//! omits empty arrays and older documents predate some fields, so anything
//! that can be absent deserializes with a default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PostId;

/// A blog post as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: PostId,
    /// Post title.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Header image URL.
    pub img_url: String,
    /// Id of the authoring user. Absent on some legacy documents.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Opaque like markers. The client relies only on the count and on
    /// removing markers it added itself.
    #[serde(default)]
    pub likes: Vec<String>,
    /// Display names of users who liked the post. May lag behind `likes`.
    #[serde(default)]
    pub liked_by: Vec<String>,
    /// Comment thread, oldest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Server-set creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Number of likes on this post.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Whether the given user authored this post.
    ///
    /// False when the document carries no author id.
    pub fn owned_by(&self, user_id: &str) -> bool {
        self.owner_id.as_deref() == Some(user_id)
    }
}

/// A single comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment body.
    pub text: String,
    /// Display name of the commenter.
    pub user: String,
    /// When the comment was written. Locally-stamped for provisional
    /// comments, server-set once confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The authenticated user's profile, from `GET /me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier. The backend serializes this as `_id` on the
    /// profile endpoint and `id` elsewhere; both are accepted.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
