//! # blogpost-client
//!
//! Client library for the Blog-Post REST API.
//!
//! This is the main library that applications embed to talk to a
//! Blog-Post backend.
//!
//! ## Features
//!
//! - **Optimistic mutations**: the cache updates before the server
//!   answers; failures revert exactly or refetch
//! - **Session persistence**: token and liked posts survive restarts
//! - **Transport abstraction**: pluggable request layer (reqwest, mock)
//! - **Pure state core**: uses blogpost-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use blogpost_client::{BlogClient, ClientConfig};
//!
//! let config = ClientConfig::default();
//! let client = BlogClient::new_http(&config);
//!
//! client.login("me@example.com", "secret").await?;
//! client.refresh_all().await?;
//!
//! for post in client.posts().await {
//!     println!("{}", post.title);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod client;
pub mod session;
pub mod store;
pub mod transport;

pub use api::ApiClient;
pub use client::{BlogClient, ClientConfig, ClientError, DEFAULT_API_URL};
pub use session::{Session, FALLBACK_DISPLAY_NAME};
pub use store::{StateStore, StoreError};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, MockTransport, Transport, TransportError,
};
