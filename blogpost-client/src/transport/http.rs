//! HTTP transport backed by reqwest.

use async_trait::async_trait;

use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};

/// The custom header the backend reads the session token from.
const AUTH_HEADER: &str = "Auth";

/// Production transport: requests go to a real backend over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the given API base URL
    /// (e.g. `https://blog.example/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a transport with a preconfigured reqwest client.
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, http }
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            TransportError::Unreachable(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };

        if let Some(token) = &request.token {
            builder = builder.header(AUTH_HEADER, token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let transport = HttpTransport::new("https://blog.example/api/");
        assert_eq!(transport.base_url(), "https://blog.example/api");
        assert_eq!(
            transport.url_for("/posts"),
            "https://blog.example/api/posts"
        );
    }

    #[test]
    fn url_for_joins_paths_verbatim() {
        let transport = HttpTransport::new("https://blog.example/api");
        assert_eq!(
            transport.url_for("/post/like/64f1"),
            "https://blog.example/api/post/like/64f1"
        );
    }
}
