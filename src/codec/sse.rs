//! Server-Sent Events (SSE) codec for streaming A2A responses
//!
//! Each SSE `data:` payload is a complete JSON-RPC response whose result is a
//! status or artifact update.

use std::fmt;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use tracing::{trace, warn};

use crate::protocol::{
    error::A2AError,
    jsonrpc::VersionPolicy,
    rpc::A2AProtocol,
    stream::StreamEvent,
};

/// SSE codec for parsing streaming responses
#[derive(Debug, Clone, Copy, Default)]
pub struct SseCodec {
    protocol: A2AProtocol,
}

impl SseCodec {
    /// Create a new SSE codec
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec checking `jsonrpc` with `policy`
    pub fn with_version_policy(policy: VersionPolicy) -> Self {
        Self {
            protocol: A2AProtocol::with_version_policy(policy),
        }
    }

    /// Decode the data of one SSE event
    pub fn decode_event(&self, data: &str) -> Result<StreamEvent, A2AError> {
        self.protocol.parse_stream_event(data.as_bytes())
    }

    /// Parse an SSE byte stream into a stream of task events
    ///
    /// Events without data (keep-alives, comments) are skipped. A JSON-RPC
    /// error inside an event is yielded as [`A2AError::Rpc`].
    pub fn parse_stream<S, B, E>(
        &self,
        byte_stream: S,
    ) -> impl Stream<Item = Result<StreamEvent, A2AError>> + Send + 'static
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let codec = *self;
        byte_stream
            .eventsource()
            .filter_map(move |result| async move {
                match result {
                    Ok(event) if event.data.trim().is_empty() => None,
                    Ok(event) => {
                        trace!(event = %event.event, id = %event.id, "SSE event");
                        let decoded = codec.decode_event(&event.data);
                        if let Err(err) = &decoded {
                            warn!(error = %err, "Failed to decode SSE event");
                        }
                        Some(decoded)
                    }
                    Err(e) => Some(Err(A2AError::Transport(format!("SSE stream error: {}", e)))),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::pin_mut;

    use super::*;

    fn byte_stream(
        chunks: Vec<&'static str>,
    ) -> impl Stream<Item = Result<Bytes, A2AError>> + Send + 'static {
        futures::stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c))))
    }

    #[tokio::test]
    async fn test_parse_sse_stream() {
        let codec = SseCodec::new();
        let sse_data = "data: {\"jsonrpc\":\"2.0\",\"id\":\"1\",\"result\":{\"id\":\"t\",\"status\":{\"state\":\"working\",\"timestamp\":\"2025-01-01T00:00:00Z\"}}}\n\n\
                        data: {\"jsonrpc\":\"2.0\",\"id\":\"1\",\"result\":{\"id\":\"t\",\"artifact\":{\"parts\":[{\"type\":\"text\",\"text\":\"A\"}],\"index\":0}}}\n\n\
                        data: {\"jsonrpc\":\"2.0\",\"id\":\"1\",\"result\":{\"id\":\"t\",\"status\":{\"state\":\"completed\",\"timestamp\":\"2025-01-01T00:00:01Z\"},\"final\":true}}\n\n";

        let events = codec.parse_stream(byte_stream(vec![sse_data]));
        pin_mut!(events);

        let first = events.next().await.unwrap().unwrap();
        assert!(matches!(first, StreamEvent::Status(_)));
        assert!(!first.is_final());

        let second = events.next().await.unwrap().unwrap();
        assert!(matches!(second, StreamEvent::Artifact(_)));

        let third = events.next().await.unwrap().unwrap();
        assert!(third.is_final());
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_event_split_across_chunks() {
        let codec = SseCodec::new();
        let chunks = vec![
            ": keep-alive\n\n",
            "data: {\"jsonrpc\":\"2.0\",\"result\":{\"id\":\"t\",",
            "\"artifact\":{\"parts\":[{\"type\":\"text\",\"text\":\"B\"}]}}}\n\n",
        ];

        let events = codec.parse_stream(byte_stream(chunks));
        pin_mut!(events);

        let event = events.next().await.unwrap().unwrap();
        assert_eq!(event.task_id(), "t");
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_parse_sse_error() {
        let codec = SseCodec::new();
        let sse_data = "data: {\"jsonrpc\":\"2.0\",\"error\":{\"code\":-32003,\"message\":\"Push Notification is not supported\"},\"id\":\"1\"}\n\n";

        let events = codec.parse_stream(byte_stream(vec![sse_data]));
        pin_mut!(events);

        match events.next().await.unwrap() {
            Err(A2AError::Rpc(error)) => {
                assert_eq!(error.code, -32003);
                assert_eq!(error.message, "Push Notification is not supported");
            }
            other => panic!("Expected Rpc error, got {:?}", other),
        }
    }
}
