//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower_layer::Layer;
use url::Url;

use crate::{
    client::{AgentClient, ClientConfig},
    codec::{Codec, JsonRpcCodec, SseCodec},
    layer::{A2AValidationLayer, A2AValidationService},
    protocol::{error::A2AError, jsonrpc::VersionPolicy},
    service::A2AProtocolService,
    transport::{HttpTransport, Transport},
};

/// Client assembled by [`A2AClientBuilder`]
pub type A2AClient<T> = AgentClient<A2AValidationService<A2AProtocolService<T>>>;

/// Builder for constructing A2A clients
///
/// # Example
///
/// ```rust,no_run
/// use tower_a2a_rpc::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "https://agent.example.com/a2a".parse()?;
/// let mut client = A2AClientBuilder::new_http(url)
///     .with_header("Authorization", "Bearer token123")
///     .with_timeout(Duration::from_secs(60))
///     .build()?;
///
/// let task = client
///     .send_task(TaskSendParams::new("task-1", Message::user("Hello")))
///     .await?;
/// println!("Task {} is {}", task.id, task.status.state);
/// # Ok(())
/// # }
/// ```
pub struct A2AClientBuilder<T: Transport> {
    agent_url: Url,
    transport: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    config: ClientConfig,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Start a builder; a transport must be supplied with
    /// [`with_transport`](Self::with_transport)
    pub fn new(agent_url: Url) -> Self {
        Self {
            config: ClientConfig::new(agent_url.as_str()),
            agent_url,
            transport: None,
            codec: None,
        }
    }

    /// Use a custom transport
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom codec instead of [`JsonRpcCodec`]
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Send a header with every request
    ///
    /// Credentials are passed this way; they are never inspected.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_header(key, value);
        self
    }

    /// Enable or disable response validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.config = self.config.with_validation(enabled);
        self
    }

    /// Choose how the `jsonrpc` member of responses is checked
    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.config = self.config.with_version_policy(policy);
        self
    }

    /// Build the A2A client
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured.
    pub fn build(self) -> Result<A2AClient<T>, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::Transport("Transport not configured. Call with_transport()".into())
        })?;

        let policy = self.config.version_policy;
        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(JsonRpcCodec::with_version_policy(policy)));

        let service = A2AProtocolService::new(transport, codec)
            .with_sse_codec(SseCodec::with_version_policy(policy));
        let service = A2AValidationLayer::new()
            .with_response_validation(self.config.validate_responses)
            .layer(service);

        tracing::debug!(agent_url = %self.agent_url, "Built A2A client");
        Ok(AgentClient::new(service, self.config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a new client builder with HTTP transport
    ///
    /// # Arguments
    ///
    /// * `agent_url` - The JSON-RPC endpoint of the agent (e.g., "<https://agent.example.com/a2a>")
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone());
        Self::new(agent_url).with_transport(transport)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::mock::MockTransport;

    fn agent_url() -> Url {
        "https://example.com".parse().unwrap()
    }

    #[test]
    fn test_builder_with_http() {
        let client = A2AClientBuilder::new_http(agent_url()).build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_builder_without_transport() {
        let client = A2AClientBuilder::<MockTransport>::new(agent_url()).build();
        assert!(matches!(client, Err(A2AError::Transport(_))));
    }

    #[test]
    fn test_builder_with_mock_transport() {
        let client = A2AClientBuilder::new(agent_url())
            .with_transport(MockTransport::json(json!({"jsonrpc": "2.0", "result": null})))
            .with_codec(Arc::new(JsonRpcCodec::new()))
            .build();

        assert!(client.is_ok());
    }

    #[test]
    fn test_builder_all_options() {
        let client = A2AClientBuilder::new_http(agent_url())
            .with_header("Authorization", "Bearer token")
            .with_timeout(Duration::from_secs(45))
            .with_validation(false)
            .with_version_policy(VersionPolicy::Lenient)
            .build()
            .unwrap();

        let config = client.config();
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.headers["Authorization"], "Bearer token");
        assert!(!config.validate_responses);
        assert_eq!(config.agent_url, "https://example.com/");
    }
}
