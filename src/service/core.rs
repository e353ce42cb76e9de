//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::StreamExt;
use tower_service::Service;
use tracing::{debug, warn};

use crate::{
    codec::{Codec, SseCodec},
    protocol::error::A2AError,
    service::{A2ARequest, A2AResponse},
    transport::{StreamBody, Transport, TransportRequest, TransportResponse},
};

/// Core A2A protocol service that wraps a transport
///
/// Every operation is encoded as one JSON-RPC request and POSTed to the agent
/// URL. Streaming methods are read back as Server-Sent Events.
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
    sse: SseCodec,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    /// * `codec` - The codec for serialization/deserialization
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self {
            transport,
            codec,
            sse: SseCodec::new(),
        }
    }

    /// Use a specific SSE codec for streaming methods
    pub fn with_sse_codec(mut self, sse: SseCodec) -> Self {
        self.sse = sse;
        self
    }

    /// Build a transport request from an A2A operation
    fn build_transport_request(
        req: &A2ARequest,
        codec: &dyn Codec,
    ) -> Result<TransportRequest, A2AError> {
        let accept = if req.operation.is_streaming() {
            "text/event-stream"
        } else {
            codec.content_type()
        };

        let mut transport_req = TransportRequest::new("", "POST")
            .header("Content-Type", codec.content_type())
            .header("Accept", accept);

        for (key, value) in &req.context.headers {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        let body = codec.encode_request(&req.operation)?;
        Ok(transport_req.body(body))
    }

    /// Parse a transport response into an A2A response
    fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        req: &A2ARequest,
    ) -> Result<A2AResponse, A2AError> {
        if !transport_resp.is_success() {
            let err = transport_resp.into_error();
            warn!(method = %req.operation.method(), error = %err, "Request failed");
            return Err(err);
        }

        codec.decode_response(&transport_resp.body, &req.operation)
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport + Clone,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();
        let sse = self.sse;

        Box::pin(async move {
            let transport_req = Self::build_transport_request(&req, codec.as_ref())?;
            debug!(
                method = %req.operation.method(),
                task_id = req.operation.task_id(),
                "Calling agent"
            );

            let exchange = async {
                if req.operation.is_streaming() && transport.supports_streaming() {
                    match transport.execute_stream(transport_req).await? {
                        StreamBody::Events(bytes) => {
                            Ok::<_, A2AError>(A2AResponse::Stream(sse.parse_stream(bytes).boxed()))
                        }
                        StreamBody::Json(body) => {
                            debug!(method = %req.operation.method(), "Stream answered with a JSON body");
                            codec.decode_response(&body, &req.operation)
                        }
                    }
                } else {
                    let transport_resp = transport.execute(transport_req).await?;
                    Self::parse_transport_response(transport_resp, codec.as_ref(), &req)
                }
            };

            match req.context.timeout {
                Some(timeout) => tokio::time::timeout(timeout, exchange)
                    .await
                    .map_err(|_| A2AError::Timeout)?,
                None => exchange.await,
            }
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
            sse: self.sse,
        }
    }
}
