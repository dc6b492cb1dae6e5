//! BlogClient - the main client interface.
//!
//! This module provides [`BlogClient`], the application-facing handle that
//! owns all client-side state: the session, the post catalog, the
//! liked-posts set and the per-post pending-mutation guard.
//!
//! # Architecture
//!
//! ```text
//! Application
//!     |
//!     v
//! BlogClient ----> ApiClient ----> Transport ----> Blog-Post API
//!     |
//!     v
//! blogpost-core (pure state: catalog, liked set, pending guard)
//! ```
//!
//! # Mutation protocol
//!
//! Every post mutation runs the same sequence:
//!
//! 1. Preconditions (session token, field validation, known id, no other
//!    mutation in flight for the post) - all checked before any I/O.
//! 2. Optimistic cache update.
//! 3. Remote call.
//! 4. Confirm (reconcile with the server's copy where the response carries
//!    one) or revert. Reverts are exact inverses where the inverse is
//!    known, and a wholesale refetch where it is not.
//!
//! # Example
//!
//! ```ignore
//! use blogpost_client::{BlogClient, ClientConfig};
//!
//! let config = ClientConfig::default().with_data_dir("/home/me/.blogpost");
//! let client = BlogClient::new_http(&config);
//!
//! client.restore_session().await;
//! client.refresh_all().await?;
//! client.like_post(&post_id).await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use blogpost_core::{LikedSet, MutationKind, PendingError, PendingMutations, PostCatalog};
use blogpost_types::{
    ApiError, Comment, CommentRequest, LoginRequest, NewPost, Post, PostId, PostUpdate,
    RegisterRequest, UserProfile, REGISTER_SUCCESS_MESSAGE,
};

use crate::api::ApiClient;
use crate::session::Session;
use crate::store::StateStore;
use crate::transport::{HttpTransport, Transport};

/// Default public deployment of the Blog-Post API.
pub const DEFAULT_API_URL: &str = "https://blog-post-api-c28n.onrender.com/api";

/// Errors returned by [`BlogClient`] operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The operation requires a logged-in session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The input was rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// The post id is not in the local catalog.
    #[error("unknown post: {0}")]
    UnknownPost(PostId),

    /// Another mutation for the same post is still in flight.
    #[error("{0}")]
    Busy(#[from] PendingError),

    /// The server or the transport refused the request.
    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Configuration for [`BlogClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Blog-Post API.
    pub api_url: String,
    /// Directory for persisted state (token, liked posts). `None` keeps
    /// everything in memory.
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a config pointing at the given API base URL, no persistence.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            data_dir: None,
        }
    }

    /// Persist session state under the given directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// High-level client for the Blog-Post API.
///
/// All state lives behind async mutexes; accessors return cloned
/// snapshots so no lock outlives a call. Locks are never held across a
/// network await, so a slow request cannot block reads of the cache.
pub struct BlogClient<T: Transport> {
    api: ApiClient<T>,
    store: StateStore,
    session: Arc<Mutex<Session>>,
    posts: Arc<Mutex<PostCatalog>>,
    liked: Arc<Mutex<LikedSet>>,
    pending: Arc<Mutex<PendingMutations>>,
}

impl BlogClient<HttpTransport> {
    /// Create a client backed by a real HTTP transport.
    pub fn new_http(config: &ClientConfig) -> Self {
        Self::new(config, HttpTransport::new(&config.api_url))
    }
}

impl<T: Transport> BlogClient<T> {
    /// Create a client over the given transport.
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        let store = match &config.data_dir {
            Some(dir) => StateStore::at(dir),
            None => StateStore::in_memory(),
        };
        Self {
            api: ApiClient::new(transport),
            store,
            session: Arc::new(Mutex::new(Session::new())),
            posts: Arc::new(Mutex::new(PostCatalog::new())),
            liked: Arc::new(Mutex::new(LikedSet::new())),
            pending: Arc::new(Mutex::new(PendingMutations::new())),
        }
    }

    /// Access the underlying transport (for testing).
    pub fn transport(&self) -> &T {
        self.api.transport()
    }

    // ======== Snapshots ========

    /// Whether a session token is present.
    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    /// The logged-in user's profile, when the profile fetch has succeeded.
    pub async fn current_user(&self) -> Option<UserProfile> {
        self.session.lock().await.user().cloned()
    }

    /// Snapshot of the cached posts, newest first.
    pub async fn posts(&self) -> Vec<Post> {
        self.posts.lock().await.posts().to_vec()
    }

    /// Snapshot of one cached post.
    pub async fn post(&self, id: &PostId) -> Option<Post> {
        self.posts.lock().await.get(id).cloned()
    }

    /// Whether this session has liked the given post.
    pub async fn has_liked(&self, id: &PostId) -> bool {
        self.liked.lock().await.contains(id)
    }

    /// Snapshot of the liked-posts set.
    pub async fn liked_posts(&self) -> LikedSet {
        self.liked.lock().await.clone()
    }

    // ======== Session ========

    /// Restore persisted session state from the data directory.
    ///
    /// Returns `true` when a stored token was found. A restored token is
    /// tentative: [`fetch_current_user`](Self::fetch_current_user) is what
    /// actually validates it against the server. Corrupt state files are
    /// logged and skipped, never fatal.
    pub async fn restore_session(&self) -> bool {
        let token = match self.store.load_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("ignoring persisted token: {}", e);
                None
            }
        };
        let liked = match self.store.load_liked().await {
            Ok(liked) => liked,
            Err(e) => {
                tracing::warn!("ignoring persisted liked posts: {}", e);
                None
            }
        };

        if let Some(liked) = liked {
            *self.liked.lock().await = liked;
        }
        match token {
            Some(token) => {
                self.session.lock().await.set_token(token);
                tracing::info!("session restored from disk");
                true
            }
            None => false,
        }
    }

    /// Log in with email and password.
    ///
    /// On success the token is persisted, the session becomes
    /// authenticated and the user profile is fetched (best effort). On
    /// any failure nothing is mutated: no token, no session change, no
    /// disk write.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response = self.api.login(&request).await?;

        // A 2xx without a token is a rejection the backend forgot to flag.
        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            return Err(ClientError::Api(ApiError::Rejected {
                status: 200,
                message: response.message,
            }));
        };

        self.adopt_token(token).await;
        self.fetch_current_user().await;
        tracing::info!("logged in");
        Ok(())
    }

    /// Register a new account.
    ///
    /// The backend reports registration failures with a 2xx status and a
    /// message, so success is detected by the exact success message, not
    /// by status alone. When the response carries a token the session is
    /// logged in immediately; otherwise registration succeeded but a
    /// separate login is needed.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let request = RegisterRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response = self.api.register(&request).await?;

        if response.message.as_deref() != Some(REGISTER_SUCCESS_MESSAGE) {
            return Err(ClientError::Api(ApiError::Rejected {
                status: 200,
                message: response.message,
            }));
        }

        if let Some(token) = response.token.filter(|t| !t.is_empty()) {
            self.adopt_token(token).await;
            self.fetch_current_user().await;
        }
        tracing::info!("account registered");
        Ok(())
    }

    /// Log out. Infallible: memory is always cleared, and failures to
    /// remove the persisted files are logged, not returned.
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear_token().await {
            tracing::warn!("failed to remove persisted token: {}", e);
        }
        if let Err(e) = self.store.clear_liked().await {
            tracing::warn!("failed to remove persisted liked posts: {}", e);
        }
        self.session.lock().await.clear();
        self.liked.lock().await.clear();
        self.pending.lock().await.clear();
        tracing::info!("logged out");
    }

    /// Fetch the logged-in user's profile.
    ///
    /// On failure the profile is cleared but the token is kept; the
    /// caller decides whether a stale token warrants a logout. When the
    /// fetched identity differs from the liked-set owner, the liked set
    /// is rebuilt from the catalog's like attributions.
    pub async fn fetch_current_user(&self) -> Option<UserProfile> {
        let token = {
            let session = self.session.lock().await;
            session.token().map(str::to_owned)
        }?;

        match self.api.current_user(&token).await {
            Ok(response) => {
                let user = response.user;
                self.session.lock().await.set_user(Some(user.clone()));
                self.reconcile_liked_owner(&user).await;
                tracing::debug!("profile loaded for user {}", user.id);
                Some(user)
            }
            Err(e) => {
                tracing::warn!("profile fetch failed: {}", e);
                self.session.lock().await.set_user(None);
                None
            }
        }
    }

    // ======== Catalog ========

    /// Fetch all posts and replace the catalog wholesale.
    ///
    /// Safe to call repeatedly; the same server state always yields the
    /// same catalog. This is also the recovery path for failed mutations
    /// whose optimistic change has no exact inverse.
    pub async fn refresh_all(&self) -> Result<usize, ClientError> {
        let response = self.api.fetch_posts().await?;
        let count = response.posts.len();
        self.posts.lock().await.replace_all(response.posts);
        tracing::debug!("catalog refreshed, {} posts", count);
        Ok(count)
    }

    /// Fetch one post's comment thread and replace the cached copy.
    pub async fn refresh_comments(&self, id: &PostId) -> Result<(), ClientError> {
        let token = self.require_token().await?;
        if !self.posts.lock().await.contains(id) {
            return Err(ClientError::UnknownPost(id.clone()));
        }
        self.refresh_comments_with(&token, id).await
    }

    // ======== Mutations ========

    /// Create a post.
    ///
    /// All three fields are required non-empty after trimming. Creation
    /// is not optimistic: the entity's id and timestamp are server-owned,
    /// so the catalog is only touched once the server's copy arrives. The
    /// new post is prepended, matching the newest-first catalog order.
    pub async fn create_post(
        &self,
        title: &str,
        description: &str,
        img_url: &str,
    ) -> Result<Post, ClientError> {
        let token = self.require_token().await?;
        let title = title.trim();
        let description = description.trim();
        let img_url = img_url.trim();
        if title.is_empty() {
            return Err(ClientError::Validation("Title is required".to_owned()));
        }
        if description.is_empty() {
            return Err(ClientError::Validation(
                "Description is required".to_owned(),
            ));
        }
        if img_url.is_empty() {
            return Err(ClientError::Validation("Image URL is required".to_owned()));
        }

        let request = NewPost {
            title: title.to_owned(),
            description: description.to_owned(),
            img_url: img_url.to_owned(),
        };
        let response = self.api.add_post(&token, &request).await?;
        let post = response.post;
        tracing::info!("post created: {}", post.id);
        self.posts.lock().await.prepend(post.clone());
        Ok(post)
    }

    /// Delete a post.
    ///
    /// The post is removed from the catalog before the request goes out.
    /// On confirmation the liked-set entry (if any) is pruned too; on
    /// failure the catalog is refetched, which restores the post.
    pub async fn delete_post(&self, id: &PostId) -> Result<(), ClientError> {
        let token = self.require_token().await?;
        self.begin_mutation(id, MutationKind::Delete).await?;
        let result = self.delete_post_inner(&token, id).await;
        self.finish_mutation(id).await;
        result
    }

    async fn delete_post_inner(&self, token: &str, id: &PostId) -> Result<(), ClientError> {
        if self.posts.lock().await.remove(id).is_none() {
            return Err(ClientError::UnknownPost(id.clone()));
        }
        tracing::debug!("optimistically removed post {}", id);

        match self.api.delete_post(token, id).await {
            Ok(_) => {
                let pruned = { self.liked.lock().await.remove(id) };
                if pruned {
                    self.persist_liked().await;
                }
                tracing::info!("post deleted: {}", id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("delete of {} failed, refetching catalog: {}", id, e);
                self.recover_catalog().await;
                Err(e.into())
            }
        }
    }

    /// Edit a post's title, description and image URL.
    ///
    /// Title and description must be non-empty after trimming. The update
    /// is merged into the cached entity before the request goes out; when
    /// the response carries the server's copy, that copy replaces the
    /// merged one. On failure the catalog is refetched to discard the
    /// unconfirmed edit.
    pub async fn edit_post(&self, id: &PostId, update: PostUpdate) -> Result<(), ClientError> {
        let token = self.require_token().await?;
        if update.title.trim().is_empty() || update.description.trim().is_empty() {
            return Err(ClientError::Validation(
                "Title and description cannot be empty".to_owned(),
            ));
        }
        self.begin_mutation(id, MutationKind::Edit).await?;
        let result = self.edit_post_inner(&token, id, update).await;
        self.finish_mutation(id).await;
        result
    }

    async fn edit_post_inner(
        &self,
        token: &str,
        id: &PostId,
        update: PostUpdate,
    ) -> Result<(), ClientError> {
        {
            let mut posts = self.posts.lock().await;
            if !posts.apply_update(id, &update) {
                return Err(ClientError::UnknownPost(id.clone()));
            }
        }
        tracing::debug!("optimistically edited post {}", id);

        match self.api.update_post(token, id, &update).await {
            Ok(Some(server_copy)) => {
                self.posts.lock().await.replace(server_copy);
                tracing::info!("edit confirmed for {}", id);
                Ok(())
            }
            Ok(None) => {
                tracing::info!("edit confirmed for {}", id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("edit of {} failed, refetching catalog: {}", id, e);
                self.recover_catalog().await;
                Err(e.into())
            }
        }
    }

    /// Like a post.
    ///
    /// The like count, the attribution list and the liked-posts set are
    /// all updated before the request goes out. On failure every one of
    /// those changes is reverted exactly. Liking an already-liked post is
    /// not rejected here; the server owns that judgement.
    pub async fn like_post(&self, id: &PostId) -> Result<(), ClientError> {
        let token = self.require_token().await?;
        self.begin_mutation(id, MutationKind::Like).await?;
        let result = self.like_post_inner(&token, id).await;
        self.finish_mutation(id).await;
        result
    }

    async fn like_post_inner(&self, token: &str, id: &PostId) -> Result<(), ClientError> {
        let (marker, name) = self.like_identity().await;
        {
            let mut posts = self.posts.lock().await;
            if !posts.add_like(id, &marker, &name) {
                return Err(ClientError::UnknownPost(id.clone()));
            }
        }
        {
            self.liked.lock().await.insert(id.clone());
        }
        self.persist_liked().await;
        tracing::debug!("optimistically liked {}", id);

        match self.api.like_post(token, id).await {
            Ok(_) => {
                tracing::info!("like confirmed for {}", id);
                Ok(())
            }
            Err(e) => {
                {
                    self.posts.lock().await.remove_like(id, &marker, &name);
                }
                {
                    self.liked.lock().await.remove(id);
                }
                self.persist_liked().await;
                tracing::warn!("like of {} failed, reverted: {}", id, e);
                Err(e.into())
            }
        }
    }

    /// Remove this session's like from a post.
    ///
    /// The optimistic removal drops one like marker, which is not exactly
    /// invertible (the server's marker for this user is unknown). On
    /// failure the catalog is refetched and the liked-set membership is
    /// restored.
    pub async fn unlike_post(&self, id: &PostId) -> Result<(), ClientError> {
        let token = self.require_token().await?;
        self.begin_mutation(id, MutationKind::Unlike).await?;
        let result = self.unlike_post_inner(&token, id).await;
        self.finish_mutation(id).await;
        result
    }

    async fn unlike_post_inner(&self, token: &str, id: &PostId) -> Result<(), ClientError> {
        let (marker, name) = self.like_identity().await;
        {
            let mut posts = self.posts.lock().await;
            if !posts.remove_like(id, &marker, &name) {
                return Err(ClientError::UnknownPost(id.clone()));
            }
        }
        {
            self.liked.lock().await.remove(id);
        }
        self.persist_liked().await;
        tracing::debug!("optimistically unliked {}", id);

        match self.api.unlike_post(token, id).await {
            Ok(_) => {
                tracing::info!("unlike confirmed for {}", id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("unlike of {} failed, refetching catalog: {}", id, e);
                self.recover_catalog().await;
                {
                    self.liked.lock().await.insert(id.clone());
                }
                self.persist_liked().await;
                Err(e.into())
            }
        }
    }

    /// Comment on a post.
    ///
    /// A provisional comment (attributed to the session's display name,
    /// stamped now) is appended before the request goes out. When the
    /// response carries the full thread, the thread replaces the cached
    /// one verbatim, superseding the provisional entry. On failure the
    /// thread is refetched; if even that fails, the provisional comment
    /// is retracted.
    pub async fn comment_post(&self, id: &PostId, text: &str) -> Result<(), ClientError> {
        let token = self.require_token().await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation(
                "Comment cannot be empty".to_owned(),
            ));
        }
        self.begin_mutation(id, MutationKind::Comment).await?;
        let result = self.comment_post_inner(&token, id, text).await;
        self.finish_mutation(id).await;
        result
    }

    async fn comment_post_inner(
        &self,
        token: &str,
        id: &PostId,
        text: &str,
    ) -> Result<(), ClientError> {
        let author = {
            let session = self.session.lock().await;
            session.display_name().to_owned()
        };
        let provisional = Comment {
            text: text.to_owned(),
            user: author,
            created_at: Some(Utc::now()),
        };
        {
            let mut posts = self.posts.lock().await;
            if !posts.push_comment(id, provisional.clone()) {
                return Err(ClientError::UnknownPost(id.clone()));
            }
        }
        tracing::debug!("optimistically commented on {}", id);

        let request = CommentRequest {
            comment: text.to_owned(),
        };
        match self.api.add_comment(token, id, &request).await {
            Ok(response) => {
                if let Some(thread) = response.post_comment {
                    self.posts.lock().await.set_comments(id, thread);
                }
                tracing::info!("comment confirmed for {}", id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("comment on {} failed, refetching thread: {}", id, e);
                if let Err(refresh_err) = self.refresh_comments_with(token, id).await {
                    tracing::warn!(
                        "thread refetch for {} failed, retracting comment: {}",
                        id,
                        refresh_err
                    );
                    self.posts.lock().await.retract_comment(id, &provisional);
                }
                Err(e.into())
            }
        }
    }

    // ======== Plumbing ========

    async fn require_token(&self) -> Result<String, ClientError> {
        let session = self.session.lock().await;
        match session.token() {
            Some(token) if !token.is_empty() => Ok(token.to_owned()),
            _ => Err(ClientError::NotAuthenticated),
        }
    }

    /// Persist the token (best effort) and install it in the session.
    async fn adopt_token(&self, token: String) {
        if let Err(e) = self.store.save_token(&token).await {
            tracing::warn!("failed to persist token: {}", e);
        }
        self.session.lock().await.set_token(token);
    }

    /// Rebuild the liked set from the catalog's like attributions when
    /// the persisted set belongs to a different user (or to nobody).
    async fn reconcile_liked_owner(&self, user: &UserProfile) {
        let owned = { self.liked.lock().await.is_owned_by(&user.id) };
        if owned {
            return;
        }
        let rebuilt = {
            let posts = self.posts.lock().await;
            LikedSet::rebuild(user.id.clone(), &user.name, posts.posts())
        };
        tracing::debug!(
            "rebuilt liked set for user {}: {} posts",
            user.id,
            rebuilt.len()
        );
        {
            *self.liked.lock().await = rebuilt;
        }
        self.persist_liked().await;
    }

    async fn persist_liked(&self) {
        let snapshot = { self.liked.lock().await.clone() };
        if let Err(e) = self.store.save_liked(&snapshot).await {
            tracing::warn!("failed to persist liked posts: {}", e);
        }
    }

    async fn begin_mutation(&self, id: &PostId, kind: MutationKind) -> Result<(), ClientError> {
        self.pending.lock().await.begin(id, kind)?;
        Ok(())
    }

    async fn finish_mutation(&self, id: &PostId) {
        self.pending.lock().await.finish(id);
    }

    /// Refetch the catalog after a failed mutation. The refetch itself is
    /// best effort: if it fails too, the cache keeps the optimistic state
    /// and the caller still sees the original error.
    async fn recover_catalog(&self) {
        if let Err(e) = self.refresh_all().await {
            tracing::warn!("catalog refetch after failed mutation also failed: {}", e);
        }
    }

    async fn refresh_comments_with(&self, token: &str, id: &PostId) -> Result<(), ClientError> {
        let response = self.api.fetch_comments(token, id).await?;
        let thread = response.post_comment.unwrap_or_default();
        self.posts.lock().await.set_comments(id, thread);
        Ok(())
    }

    /// The marker and display name this session attaches to a like. The
    /// marker is a placeholder until the profile has loaded; the server's
    /// copy replaces it on the next refresh.
    async fn like_identity(&self) -> (String, String) {
        let session = self.session.lock().await;
        let marker = session.user_id().unwrap_or("local").to_owned();
        let name = session.display_name().to_owned();
        (marker, name)
    }
}
