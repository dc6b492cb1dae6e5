//! Transport abstraction for the Blog-Post API.
//!
//! This module provides a pluggable request/response layer that abstracts
//! the underlying HTTP mechanism (reqwest in production, mock for tests).
//!
//! # Design
//!
//! The transport trait is a single async call: it takes a described
//! request (method, path, token, JSON body) and returns the raw status
//! and body bytes. Everything above it - envelope parsing, error
//! normalization, optimistic state - is transport-independent, so the
//! whole client can be exercised against [`MockTransport`].
//!
//! # Example
//!
//! ```ignore
//! let transport = HttpTransport::new("https://blog.example/api");
//! let request = ApiRequest::new(Method::Get, "/posts");
//! let response = transport.execute(request).await?;
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response arrived: connect failure or timeout.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The request failed some other way before a usable response.
    #[error("request failed: {0}")]
    Request(String),
}

/// HTTP method for an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        write!(f, "{}", name)
    }
}

/// A request to the Blog-Post API, described independently of any HTTP
/// library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    /// Session token, sent as the backend's custom `Auth` header.
    pub token: Option<String>,
    /// JSON request body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no token and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            token: None,
            body: None,
        }
    }

    /// Attach a session token.
    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_owned);
        self
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The raw outcome of an executed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes, unparsed.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Create a response from a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a response whose body is the given JSON value.
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            body: value.to_string().into_bytes(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for talking to the Blog-Post API.
///
/// Implementations handle the underlying HTTP mechanism (reqwest, mock).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request and return the raw response.
    ///
    /// A `Result::Err` means no usable response arrived; an error status
    /// from the server is a successful execution and comes back as an
    /// [`ApiResponse`].
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
