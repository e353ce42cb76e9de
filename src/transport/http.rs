//! HTTP transport implementation for A2A protocol

use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::protocol::error::A2AError;

use super::{
    error_from_body, is_json_content_type, StreamBody, Transport, TransportRequest,
    TransportResponse,
};

/// HTTP transport implementation using reqwest
///
/// Every JSON-RPC call is a POST to the agent URL.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a new HTTP transport with a custom reqwest client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { client, base_url }
    }

    fn request_builder(&self, request: TransportRequest) -> Result<reqwest::RequestBuilder, A2AError> {
        let url = self
            .base_url
            .join(&request.endpoint)
            .map_err(|e| A2AError::Transport(format!("Invalid endpoint {}: {}", request.endpoint, e)))?;

        let mut req_builder = match request.method.as_str() {
            "POST" => self.client.post(url),
            "GET" => self.client.get(url),
            _ => {
                return Err(A2AError::Transport(format!(
                    "Unsupported HTTP method: {}",
                    request.method
                )))
            }
        };

        for (key, value) in request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.body.is_empty() {
            req_builder = req_builder.body(request.body);
        }

        Ok(req_builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        // HTTP client is always ready
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        let response = self.request_builder(request)?.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_stream(&self, request: TransportRequest) -> Result<StreamBody, A2AError> {
        let response = self
            .request_builder(request.header("Accept", "text/event-stream"))?
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.bytes().await?;
            return Err(error_from_body(status, &body));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        debug!(status, content_type = %content_type, "Stream response");

        if is_json_content_type(&content_type) {
            return Ok(StreamBody::Json(response.bytes().await?));
        }

        Ok(StreamBody::Events(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(A2AError::from))
                .boxed(),
        ))
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}
