//! Push notification configuration

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{
    error::{A2AResult, ValidationError},
    part::PartContainer,
};

/// Where and how an agent should deliver task updates out of band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotificationConfig {
    /// Target endpoint
    pub url: String,

    /// Token the agent echoes back so the receiver can authenticate the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Authentication the receiver expects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthenticationInfo>,
}

impl PushNotificationConfig {
    /// Configuration targeting `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            authentication: None,
        }
    }

    /// Set the token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the authentication info
    pub fn with_authentication(mut self, authentication: AuthenticationInfo) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Parse the target URL
    pub fn parsed_url(&self) -> Result<Url, ValidationError> {
        Url::parse(&self.url).map_err(|e| ValidationError::InvalidUrl {
            field: "url",
            reason: e.to_string(),
        })
    }
}

/// Authentication schemes and opaque credentials for a push target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationInfo {
    /// Accepted scheme names, e.g. `Bearer`
    pub schemes: Vec<String>,

    /// Opaque credentials; never interpreted here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
}

impl AuthenticationInfo {
    /// Authentication info accepting the given schemes
    pub fn new<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schemes: schemes.into_iter().map(Into::into).collect(),
            credentials: None,
        }
    }

    /// Attach credentials
    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }
}

/// Push configuration bound to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPushNotificationConfig {
    /// Task the configuration applies to
    pub id: String,

    /// The configuration
    pub push_notification_config: PushNotificationConfig,
}

impl TaskPushNotificationConfig {
    /// Bind a configuration to a task
    pub fn new(id: impl Into<String>, config: PushNotificationConfig) -> Self {
        Self {
            id: id.into(),
            push_notification_config: config,
        }
    }
}

impl PartContainer for TaskPushNotificationConfig {
    fn check_part_types(_value: &Value) -> A2AResult<()> {
        Ok(())
    }
}
