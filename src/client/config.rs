//! Client configuration

use std::{collections::HashMap, time::Duration};

use crate::protocol::jsonrpc::VersionPolicy;

/// Configuration for an A2A client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent
    pub agent_url: String,

    /// Default request timeout
    pub timeout: Duration,

    /// Extra HTTP headers sent with every request
    pub headers: HashMap<String, String>,

    /// Enable response validation
    pub validate_responses: bool,

    /// How the `jsonrpc` member of responses is checked
    pub version_policy: VersionPolicy,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            timeout: Duration::from_secs(30),
            headers: HashMap::new(),
            validate_responses: true,
            version_policy: VersionPolicy::Strict,
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Enable or disable response validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }

    /// Set the version policy
    pub fn with_version_policy(mut self, policy: VersionPolicy) -> Self {
        self.version_policy = policy;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("https://example.com");

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate_responses);
        assert_eq!(config.version_policy, VersionPolicy::Strict);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_config_setters() {
        let config = ClientConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_header("X-Trace", "1")
            .with_validation(false)
            .with_version_policy(VersionPolicy::Lenient);

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.headers["X-Trace"], "1");
        assert!(!config.validate_responses);
        assert_eq!(config.version_policy, VersionPolicy::Lenient);
    }
}
