//! Mock transport for testing.
//!
//! Allows queueing responses and capturing executed requests for
//! verification.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiRequest, ApiResponse, Transport, TransportError};

/// Mock transport for testing.
///
/// Responses are served from a FIFO queue; every executed request is
/// recorded, including ones that then hit a forced failure, so tests can
/// assert both what was attempted and what the client did with the
/// outcome. Clones share state.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    requests: Vec<ApiRequest>,
    response_queue: VecDeque<ApiResponse>,
    fail_next_unreachable: Option<String>,
    fail_next_request: Option<String>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to be returned by the next `execute()` call.
    pub fn queue_response(&self, response: ApiResponse) {
        let mut inner = self.inner.lock().unwrap();
        inner.response_queue.push_back(response);
    }

    /// Queue a JSON response with the given status.
    pub fn queue_json(&self, status: u16, value: Value) {
        self.queue_response(ApiResponse::json(status, &value));
    }

    /// Get all requests that were executed.
    pub fn requests(&self) -> Vec<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Get the most recent executed request.
    pub fn last_request(&self) -> Option<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.last().cloned()
    }

    /// Number of requests executed so far.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    /// Cause the next execute() to fail as unreachable (connect/timeout).
    pub fn fail_next_unreachable(&self, reason: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_unreachable = Some(reason.to_string());
    }

    /// Cause the next execute() to fail with a generic request error.
    pub fn fail_next_request(&self, reason: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_request = Some(reason.to_string());
    }

    /// Clear all state (requests, queue, forced failures).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockTransportInner::default();
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut inner = self.inner.lock().unwrap();

        // Record before the failure check: a forced failure still counts
        // as an attempted call.
        inner.requests.push(request);

        if let Some(reason) = inner.fail_next_unreachable.take() {
            return Err(TransportError::Unreachable(reason));
        }
        if let Some(reason) = inner.fail_next_request.take() {
            return Err(TransportError::Request(reason));
        }

        inner
            .response_queue
            .pop_front()
            .ok_or_else(|| TransportError::Request("mock: no queued response".into()))
    }
}
