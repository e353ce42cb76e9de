//! Transport abstraction layer for A2A protocol

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::{
    collections::HashMap,
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde_json::Value;
use url::Url;

pub use http::HttpTransport;

use crate::protocol::{error::A2AError, jsonrpc::JsonRpcResponse, jsonrpc::VersionPolicy};

/// Raw body chunks of a streaming response
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, A2AError>> + Send>>;

/// Body of a streaming call, as announced by the agent
///
/// Agents may answer a streaming method with a plain JSON-RPC document
/// instead of an event stream, typically to report an error.
pub enum StreamBody {
    /// `text/event-stream` chunks
    Events(ByteStream),

    /// One complete JSON document
    Json(Bytes),
}

impl fmt::Debug for StreamBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamBody::Events(_) => f.write_str("Events(..)"),
            StreamBody::Json(body) => f.debug_tuple("Json").field(body).finish(),
        }
    }
}

/// Whether a `Content-Type` value names a JSON document
pub(crate) fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Protocol-agnostic transport request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Path relative to the agent URL; empty for the JSON-RPC endpoint itself
    pub endpoint: String,

    /// HTTP method or equivalent operation
    pub method: String,

    /// Headers or metadata for the request
    pub headers: HashMap<String, String>,

    /// Request body as bytes
    pub body: Bytes,
}

impl TransportRequest {
    /// Create a new transport request
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }
}

/// Protocol-agnostic transport response
#[derive(Debug)]
pub struct TransportResponse {
    /// Status code (e.g., HTTP status code)
    pub status: u16,

    /// Response headers or metadata
    pub headers: HashMap<String, String>,

    /// Response body as bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the response
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the response body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Check if the response indicates success (2xx status code)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Error carried by a non-2xx response
    ///
    /// Agents usually still answer with a JSON-RPC error envelope; when the
    /// body is one, the structured error is kept.
    pub fn into_error(self) -> A2AError {
        error_from_body(self.status, &self.body)
    }
}

pub(crate) fn error_from_body(status: u16, body: &[u8]) -> A2AError {
    if let Ok(response) = JsonRpcResponse::<Value>::from_slice(body, VersionPolicy::Lenient) {
        if let Some(error) = response.error() {
            return A2AError::Rpc(error.clone());
        }
    }

    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        A2AError::Transport(format!("HTTP error: {}", status))
    } else {
        A2AError::Transport(format!("HTTP {}: {}", status, text.trim()))
    }
}

/// Core transport trait for executing protocol-agnostic requests
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Check if the transport is ready to accept requests
    ///
    /// This is used by Tower's Service trait to implement backpressure
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), A2AError>>;

    /// Execute a request and collect the whole response
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError>;

    /// Execute a request whose response body is an event stream
    ///
    /// A JSON body is handed back whole as [`StreamBody::Json`]. Transports
    /// that cannot stream keep the default, which refuses.
    async fn execute_stream(&self, _request: TransportRequest) -> Result<StreamBody, A2AError> {
        Err(A2AError::Transport(format!(
            "transport for {} does not support streaming",
            self.base_url()
        )))
    }

    /// Base URL of the agent
    fn base_url(&self) -> &Url;

    /// Check if this transport supports streaming responses
    fn supports_streaming(&self) -> bool {
        false
    }
}

#[async_trait]
impl<T: Transport> Transport for Box<T> {
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        (**self).poll_ready(cx)
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        (**self).execute(request).await
    }

    async fn execute_stream(&self, request: TransportRequest) -> Result<StreamBody, A2AError> {
        (**self).execute_stream(request).await
    }

    fn base_url(&self) -> &Url {
        (**self).base_url()
    }

    fn supports_streaming(&self) -> bool {
        (**self).supports_streaming()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/event-stream"));
        assert!(!is_json_content_type(""));
    }

    #[test]
    fn test_response_status() {
        assert!(TransportResponse::new(204).is_success());
        assert!(!TransportResponse::new(404).is_success());
    }

    #[test]
    fn test_error_body_keeps_rpc_error() {
        let body = br#"{"jsonrpc":"2.0","id":"1","error":{"code":-32001,"message":"Task not found"}}"#;
        let err = TransportResponse::new(404)
            .body(Bytes::from_static(body))
            .into_error();

        assert_eq!(err.as_rpc().map(|e| e.code), Some(-32001));
    }

    #[test]
    fn test_error_body_fallback() {
        let err = error_from_body(502, b"Bad Gateway");
        assert!(matches!(err, A2AError::Transport(msg) if msg == "HTTP 502: Bad Gateway"));

        let err = error_from_body(500, b"");
        assert!(matches!(err, A2AError::Transport(msg) if msg == "HTTP error: 500"));
    }
}
