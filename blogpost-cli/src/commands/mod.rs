//! CLI command implementations.
//!
//! Each command builds a [`blogpost_client::BlogClient`] over the real
//! HTTP transport and restores the persisted session first. The command
//! logic itself is generic over the transport so tests can drive it with
//! [`blogpost_client::MockTransport`].

use std::path::Path;

use blogpost_client::{BlogClient, ClientConfig, HttpTransport};

pub mod auth;
pub mod comment;
pub mod init;
pub mod like;
pub mod post;
pub mod posts;
pub mod status;

/// Build an HTTP-backed client with state persisted under `data_dir`.
pub fn http_client(data_dir: &Path, api_url: &str) -> BlogClient<HttpTransport> {
    let config = ClientConfig::new(api_url).with_data_dir(data_dir);
    BlogClient::new_http(&config)
}
