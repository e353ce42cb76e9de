//! A2A service request types

use std::{collections::HashMap, time::Duration};

use crate::protocol::operation::A2AOperation;

/// A request to the A2A service
///
/// This wraps an A2A operation with additional context needed for execution
#[derive(Debug, Clone)]
pub struct A2ARequest {
    /// The A2A operation to execute
    pub operation: A2AOperation,

    /// Request context (timeouts, headers)
    pub context: RequestContext,
}

impl A2ARequest {
    /// Create a new A2A request
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }
}

/// Request context containing headers and configuration
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Base URL of the target agent
    pub agent_url: String,

    /// Request timeout; for streaming calls it bounds only stream setup
    pub timeout: Option<Duration>,

    /// Additional HTTP headers
    pub headers: HashMap<String, String>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            ..Self::default()
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Add a header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            agent_url: String::new(),
            timeout: Some(Duration::from_secs(30)),
            headers: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::params::TaskQueryParams;

    #[test]
    fn test_request_context_creation() {
        let context = RequestContext::new("https://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_header("X-Trace", "abc");

        assert_eq!(context.agent_url, "https://example.com");
        assert_eq!(context.timeout, Some(Duration::from_secs(60)));
        assert_eq!(context.headers.get("X-Trace"), Some(&"abc".to_string()));
        assert_eq!(context.without_timeout().timeout, None);
    }

    #[test]
    fn test_request_creation() {
        let operation = A2AOperation::GetTask(TaskQueryParams::new("task-1"));
        let request = A2ARequest::new(operation, RequestContext::new("https://example.com"));

        assert_eq!(request.context.agent_url, "https://example.com");
        assert_eq!(request.operation.task_id(), "task-1");
    }
}
