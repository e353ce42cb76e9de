//! Typed parameters of the task methods

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    error::{A2AResult, ValidationError},
    message::Message,
    part::{Metadata, PartContainer},
    push::PushNotificationConfig,
};

/// Parameters of `tasks/send` and `tasks/sendSubscribe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSendParams {
    /// Caller-assigned task id
    pub id: String,

    /// Optional session the task belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Message to deliver
    pub message: Message,

    /// Push configuration to register alongside the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_notification: Option<PushNotificationConfig>,

    /// Number of history entries to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,

    /// Optional request metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TaskSendParams {
    /// Parameters delivering `message` to task `id`
    pub fn new(id: impl Into<String>, message: Message) -> Self {
        Self {
            id: id.into(),
            session_id: None,
            message,
            push_notification: None,
            history_length: None,
            metadata: None,
        }
    }

    /// Set the session id
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Register a push target with the task
    pub fn with_push_notification(mut self, config: PushNotificationConfig) -> Self {
        self.push_notification = Some(config);
        self
    }

    /// Limit the returned history
    pub fn with_history_length(mut self, length: u32) -> Self {
        self.history_length = Some(length);
        self
    }

    /// Add a metadata field
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Check the task id, the message and the push target
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id(&self.id)?;
        self.message.validate()?;
        if let Some(config) = &self.push_notification {
            config.parsed_url()?;
        }
        Ok(())
    }
}

/// Parameters of `tasks/get` and `tasks/resubscribe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    /// Task to look up
    pub id: String,

    /// Number of history entries to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,

    /// Optional request metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TaskQueryParams {
    /// Query for task `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history_length: None,
            metadata: None,
        }
    }

    /// Limit the returned history
    pub fn with_history_length(mut self, length: u32) -> Self {
        self.history_length = Some(length);
        self
    }
}

/// Parameters naming a task: `tasks/cancel` and `tasks/pushNotification/get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskIdParams {
    /// Task the request refers to
    pub id: String,

    /// Optional request metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TaskIdParams {
    /// Parameters naming task `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: None,
        }
    }
}

pub(crate) fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        Err(ValidationError::EmptyField { field: "id" })
    } else {
        Ok(())
    }
}

impl PartContainer for TaskSendParams {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        value.get("message").map_or(Ok(()), Message::check_part_types)
    }
}

impl PartContainer for TaskQueryParams {
    fn check_part_types(_value: &Value) -> A2AResult<()> {
        Ok(())
    }
}

impl PartContainer for TaskIdParams {
    fn check_part_types(_value: &Value) -> A2AResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_send_params_wire_names() {
        let params = TaskSendParams::new("task-1", Message::user("hi"))
            .with_session_id("s-1")
            .with_history_length(5);
        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["sessionId"], "s-1");
        assert_eq!(json["historyLength"], 5);
        assert!(json.get("pushNotification").is_none());
    }

    #[test]
    fn test_send_params_validation() {
        assert!(TaskSendParams::new("task-1", Message::user("hi"))
            .validate()
            .is_ok());

        let err = TaskSendParams::new("  ", Message::user("hi"))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "id" });

        let err = TaskSendParams::new("task-1", Message::user("hi"))
            .with_push_notification(PushNotificationConfig::new("nope"))
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "url");
    }

    #[test]
    fn test_query_params_decode() {
        let params: TaskQueryParams =
            serde_json::from_value(json!({"id": "task-1", "historyLength": 2})).unwrap();
        assert_eq!(params.history_length, Some(2));
    }
}
