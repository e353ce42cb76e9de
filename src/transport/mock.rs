use std::{
    sync::Arc,
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use url::Url;

use crate::{
    protocol::error::A2AError,
    transport::{StreamBody, Transport, TransportRequest, TransportResponse},
};

type Handler = Arc<dyn Fn(TransportRequest) -> TransportResponse + Send + Sync>;
type StreamHandler = Arc<dyn Fn(TransportRequest) -> Vec<Bytes> + Send + Sync>;

/// Mock transport for internal testing
///
/// Answers requests from closures instead of the network. Streaming calls are
/// served as a sequence of raw SSE chunks.
#[derive(Clone)]
pub(crate) struct MockTransport {
    handler: Handler,
    stream_handler: Option<StreamHandler>,
    base_url: Url,
}

impl MockTransport {
    /// Create a new mock transport with a custom request handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            stream_handler: None,
            base_url: Url::parse("mock://agent").expect("static URL"),
        }
    }

    /// Serve streaming requests with the SSE chunks returned by `handler`
    ///
    /// Chunks that start with `{` are treated as one plain JSON body.
    pub fn with_stream<F>(mut self, handler: F) -> Self
    where
        F: Fn(TransportRequest) -> Vec<Bytes> + Send + Sync + 'static,
    {
        self.stream_handler = Some(Arc::new(handler));
        self
    }

    /// Answer every request with one JSON-RPC response body
    pub fn json(body: serde_json::Value) -> Self {
        Self::new(move |_| TransportResponse::new(200).body(Bytes::from(body.to_string())))
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        Ok((self.handler)(request))
    }

    async fn execute_stream(&self, request: TransportRequest) -> Result<StreamBody, A2AError> {
        match &self.stream_handler {
            Some(handler) => {
                let chunks = handler(request);
                // A body opening with `{` is served as `application/json`
                let is_json = chunks
                    .first()
                    .and_then(|chunk| chunk.iter().find(|b| !b.is_ascii_whitespace()))
                    .is_some_and(|b| *b == b'{');
                if is_json {
                    return Ok(StreamBody::Json(Bytes::from(chunks.concat())));
                }
                Ok(StreamBody::Events(
                    futures::stream::iter(chunks.into_iter().map(Ok)).boxed(),
                ))
            }
            None => Err(A2AError::Transport("mock transport has no stream handler".into())),
        }
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn supports_streaming(&self) -> bool {
        self.stream_handler.is_some()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("base_url", &self.base_url)
            .field("streaming", &self.stream_handler.is_some())
            .finish()
    }
}

/// Frame a JSON-RPC response as one SSE event
pub(crate) fn sse_event(body: &serde_json::Value) -> Bytes {
    Bytes::from(format!("data: {}\n\n", body))
}
