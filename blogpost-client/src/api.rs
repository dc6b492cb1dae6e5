//! Typed client for the Blog-Post API endpoints.
//!
//! One method per endpoint, all funneled through a single response parser
//! so the layers above see one failure contract: [`ApiError`]. The backend
//! is loose about failure signaling - it rejects with error statuses, but
//! also with 2xx responses carrying an `error` payload - and both forms
//! collapse into [`ApiError::Rejected`] here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use blogpost_types::{
    AckResponse, ApiError, CommentRequest, CommentsResponse, ErrorBody, LoginRequest,
    LoginResponse, NewPost, Post, PostId, PostResponse, PostUpdate, PostsResponse,
    RegisterRequest, RegisterResponse, UserResponse,
};

use crate::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Unreachable(reason) => {
                tracing::debug!("transport unreachable: {}", reason);
                ApiError::Unreachable
            }
            TransportError::Request(reason) => ApiError::Transport(reason),
        }
    }
}

/// Typed access to every Blog-Post API endpoint.
///
/// Generic over [`Transport`] so the whole client stack can run against
/// [`MockTransport`](crate::transport::MockTransport) in tests.
#[derive(Debug, Clone)]
pub struct ApiClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// Create a client over the given transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ======== Anonymous endpoints ========

    /// `GET /posts` - fetch the whole collection.
    pub async fn fetch_posts(&self) -> Result<PostsResponse, ApiError> {
        self.send_as(ApiRequest::new(Method::Get, "/posts")).await
    }

    /// `POST /login`.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = to_body(request)?;
        self.send_as(ApiRequest::new(Method::Post, "/login").with_body(body))
            .await
    }

    /// `POST /register`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let body = to_body(request)?;
        self.send_as(ApiRequest::new(Method::Post, "/register").with_body(body))
            .await
    }

    // ======== Authenticated endpoints ========

    /// `GET /me` - the profile behind the token.
    pub async fn current_user(&self, token: &str) -> Result<UserResponse, ApiError> {
        self.send_as(ApiRequest::new(Method::Get, "/me").with_token(Some(token)))
            .await
    }

    /// `POST /addpost` - create a post, returning the stored entity.
    pub async fn add_post(&self, token: &str, post: &NewPost) -> Result<PostResponse, ApiError> {
        let body = to_body(post)?;
        self.send_as(
            ApiRequest::new(Method::Post, "/addpost")
                .with_token(Some(token))
                .with_body(body),
        )
        .await
    }

    /// `PUT /post/:id` - edit a post.
    ///
    /// Returns the updated post when the backend echoes one (bare or
    /// wrapped under `post`); `None` when it only acknowledged.
    pub async fn update_post(
        &self,
        token: &str,
        id: &PostId,
        update: &PostUpdate,
    ) -> Result<Option<Post>, ApiError> {
        let body = to_body(update)?;
        let value = self
            .send(
                ApiRequest::new(Method::Put, format!("/post/{}", id))
                    .with_token(Some(token))
                    .with_body(body),
            )
            .await?;
        Ok(extract_post(value))
    }

    /// `DELETE /post/:id`.
    pub async fn delete_post(&self, token: &str, id: &PostId) -> Result<AckResponse, ApiError> {
        self.send_as(
            ApiRequest::new(Method::Delete, format!("/post/{}", id)).with_token(Some(token)),
        )
        .await
    }

    /// `POST /post/like/:id`.
    pub async fn like_post(&self, token: &str, id: &PostId) -> Result<AckResponse, ApiError> {
        let body = to_body(&blogpost_types::LikeRequest { id: id.clone() })?;
        self.send_as(
            ApiRequest::new(Method::Post, format!("/post/like/{}", id))
                .with_token(Some(token))
                .with_body(body),
        )
        .await
    }

    /// `DELETE /post/like/:id`.
    pub async fn unlike_post(&self, token: &str, id: &PostId) -> Result<AckResponse, ApiError> {
        self.send_as(
            ApiRequest::new(Method::Delete, format!("/post/like/{}", id)).with_token(Some(token)),
        )
        .await
    }

    /// `POST /post/comment/:id`.
    pub async fn add_comment(
        &self,
        token: &str,
        id: &PostId,
        comment: &CommentRequest,
    ) -> Result<CommentsResponse, ApiError> {
        let body = to_body(comment)?;
        self.send_as(
            ApiRequest::new(Method::Post, format!("/post/comment/{}", id))
                .with_token(Some(token))
                .with_body(body),
        )
        .await
    }

    /// `GET /post/comment/:id` - fetch one post's comment thread.
    pub async fn fetch_comments(
        &self,
        token: &str,
        id: &PostId,
    ) -> Result<CommentsResponse, ApiError> {
        self.send_as(
            ApiRequest::new(Method::Get, format!("/post/comment/{}", id)).with_token(Some(token)),
        )
        .await
    }

    // ======== Plumbing ========

    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;
        tracing::debug!("{} {} -> {}", method, path, response.status);
        parse_response(response)
    }

    async fn send_as<D: DeserializeOwned>(&self, request: ApiRequest) -> Result<D, ApiError> {
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn to_body<S: Serialize>(value: &S) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Transport(format!("encode body: {}", e)))
}

/// Collapse a raw response into a JSON value or a normalized failure.
///
/// Both rejection forms land in [`ApiError::Rejected`]: an error status
/// (message taken from the body when parseable), and a 2xx body that
/// carries an `error` field.
fn parse_response(response: ApiResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.text().map(str::to_owned));
        return Err(ApiError::Rejected {
            status: response.status,
            message,
        });
    }

    let value: Value = serde_json::from_slice(&response.body)
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(ApiError::Rejected {
            status: response.status,
            message: Some(error.to_owned()),
        });
    }

    Ok(value)
}

/// Pull a post out of an edit response, whatever its shape.
fn extract_post(value: Value) -> Option<Post> {
    if let Some(wrapped) = value.get("post") {
        return serde_json::from_value(wrapped.clone()).ok();
    }
    if value.get("_id").is_some() {
        return serde_json::from_value(value).ok();
    }
    None
}
