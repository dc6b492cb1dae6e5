//! Error types for the Blog-Post client.

use thiserror::Error;

/// A failed remote request, normalized across transports.
///
/// Every API call collapses into one of these four cases so callers never
/// see transport-specific error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered and said no: an error status, or a 2xx body
    /// carrying an `error` field.
    #[error("{}", .message.as_deref().unwrap_or("request rejected by server"))]
    Rejected {
        /// HTTP status of the response.
        status: u16,
        /// Message extracted from the response body, when it had one.
        message: Option<String>,
    },

    /// No response arrived at all (connect failure or timeout).
    #[error("No response from server. Please try again.")]
    Unreachable,

    /// The request failed on the way out, before any response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response arrived but its body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server's own message, when this failure carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
