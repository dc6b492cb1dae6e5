//! Request payloads and response envelopes for the Blog-Post API.
//!
//! One struct per endpoint body. The backend is loose about envelopes:
//! optional fields here reflect shapes it actually produces, not ideals.

use serde::{Deserialize, Serialize};

use crate::{Comment, Post, PostId, UserProfile};

/// Exact success marker returned by `POST /register`.
///
/// The backend can answer 200 with an error payload, so status alone does
/// not mean the account was created; the message must match this string.
pub const REGISTER_SUCCESS_MESSAGE: &str = "User Register Successfully!";

// ======== Request payloads ========

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password, sent in the clear over TLS.
    pub password: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name for the new account.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body of `POST /addpost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Header image URL.
    pub img_url: String,
}

/// Body of `PUT /post/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    /// Replacement title.
    pub title: String,
    /// Replacement body text.
    pub description: String,
    /// Replacement image URL.
    pub img_url: String,
}

/// Body of `POST /post/like/:id`.
///
/// The id is already in the path; the backend wants it in the body too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRequest {
    /// The post being liked.
    pub id: PostId,
}

/// Body of `POST /post/comment/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRequest {
    /// Comment text.
    pub comment: String,
}

// ======== Response envelopes ========

/// Response of `GET /posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsResponse {
    /// Every post, in server order.
    pub posts: Vec<Post>,
}

/// Response of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token. Absent when credentials were rejected with a 2xx.
    #[serde(default)]
    pub token: Option<String>,
    /// Human-readable status message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Status message; compare against [`REGISTER_SUCCESS_MESSAGE`].
    #[serde(default)]
    pub message: Option<String>,
    /// Session token, when the backend logs the new account in directly.
    #[serde(default)]
    pub token: Option<String>,
}

/// Response of `POST /addpost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    /// The stored post, with server-assigned id and timestamp.
    pub post: Post,
}

/// Response of `DELETE /post/:id` and the like endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    /// Human-readable confirmation.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the comment endpoints.
///
/// `POST /post/comment/:id` returns a message and, on newer backend
/// versions, the full refreshed thread; `GET /post/comment/:id` returns
/// just the thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentsResponse {
    /// Human-readable confirmation.
    #[serde(default)]
    pub message: Option<String>,
    /// The post's full comment list, authoritative when present.
    #[serde(rename = "postComment", default)]
    pub post_comment: Option<Vec<Comment>>,
}

/// Response of `GET /me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    /// The authenticated user's profile.
    pub user: UserProfile,
}

/// Error payload the backend attaches to failed requests.
///
/// Some endpoints use `error`, some `message`, some both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error description.
    #[serde(default)]
    pub error: Option<String>,
    /// Alternate error description.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The most specific message in this payload, `error` first.
    pub fn text(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}
