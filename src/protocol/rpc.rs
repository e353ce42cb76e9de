//! Request builders and response parsers, one pair per method

use serde_json::Value;
use tracing::debug;

use super::{
    error::{A2AError, A2AResult},
    jsonrpc::{JsonRpcRequest, JsonRpcResponse, RequestId, VersionPolicy},
    operation::A2AMethod,
    part::PartContainer,
    params::{TaskIdParams, TaskQueryParams, TaskSendParams},
    push::TaskPushNotificationConfig,
    stream::StreamEvent,
    task::{Task, TaskArtifactUpdateEvent, TaskStatusUpdateEvent},
};

/// `tasks/send` request
pub type SendTaskRequest = JsonRpcRequest<TaskSendParams>;
/// `tasks/get` request
pub type GetTaskRequest = JsonRpcRequest<TaskQueryParams>;
/// `tasks/cancel` request
pub type CancelTaskRequest = JsonRpcRequest<TaskIdParams>;
/// `tasks/sendSubscribe` request
pub type SendTaskStreamingRequest = JsonRpcRequest<TaskSendParams>;
/// `tasks/resubscribe` request
pub type TaskResubscriptionRequest = JsonRpcRequest<TaskQueryParams>;
/// `tasks/pushNotification/set` request
pub type SetTaskPushNotificationRequest = JsonRpcRequest<TaskPushNotificationConfig>;
/// `tasks/pushNotification/get` request
pub type GetTaskPushNotificationRequest = JsonRpcRequest<TaskIdParams>;

/// Typed entry point to the JSON-RPC binding
///
/// Builders set the literal method name and the version. Parsers decode the
/// envelope, surface a remote `error` as [`A2AError::Rpc`] with its code,
/// message and data intact, and otherwise re-decode `result` into the
/// method's result type.
#[derive(Debug, Clone, Copy, Default)]
pub struct A2AProtocol {
    version_policy: VersionPolicy,
}

impl A2AProtocol {
    /// Façade with the default (strict) version policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Façade checking the `jsonrpc` member with `policy`
    pub fn with_version_policy(policy: VersionPolicy) -> Self {
        Self {
            version_policy: policy,
        }
    }

    /// Policy applied on decode
    pub fn version_policy(&self) -> VersionPolicy {
        self.version_policy
    }

    /// Build a `tasks/send` request
    pub fn send_task(&self, id: RequestId, params: TaskSendParams) -> SendTaskRequest {
        JsonRpcRequest::new(Some(id), A2AMethod::SendTask.as_str(), params)
    }

    /// Build a `tasks/get` request
    pub fn get_task(&self, id: RequestId, params: TaskQueryParams) -> GetTaskRequest {
        JsonRpcRequest::new(Some(id), A2AMethod::GetTask.as_str(), params)
    }

    /// Build a `tasks/cancel` request
    pub fn cancel_task(&self, id: RequestId, params: TaskIdParams) -> CancelTaskRequest {
        JsonRpcRequest::new(Some(id), A2AMethod::CancelTask.as_str(), params)
    }

    /// Build a `tasks/sendSubscribe` request
    pub fn send_task_subscribe(
        &self,
        id: RequestId,
        params: TaskSendParams,
    ) -> SendTaskStreamingRequest {
        JsonRpcRequest::new(Some(id), A2AMethod::SendTaskSubscribe.as_str(), params)
    }

    /// Build a `tasks/resubscribe` request
    pub fn resubscribe(&self, id: RequestId, params: TaskQueryParams) -> TaskResubscriptionRequest {
        JsonRpcRequest::new(Some(id), A2AMethod::Resubscribe.as_str(), params)
    }

    /// Build a `tasks/pushNotification/set` request
    pub fn set_push_notification(
        &self,
        id: RequestId,
        params: TaskPushNotificationConfig,
    ) -> SetTaskPushNotificationRequest {
        JsonRpcRequest::new(Some(id), A2AMethod::SetPushNotification.as_str(), params)
    }

    /// Build a `tasks/pushNotification/get` request
    pub fn get_push_notification(
        &self,
        id: RequestId,
        params: TaskIdParams,
    ) -> GetTaskPushNotificationRequest {
        JsonRpcRequest::new(Some(id), A2AMethod::GetPushNotification.as_str(), params)
    }

    /// Decode a response envelope and its result into `T`
    pub fn parse_response<T: PartContainer>(&self, bytes: &[u8]) -> A2AResult<T> {
        let response = self.parse_envelope(bytes)?;
        response.decode_result()
    }

    /// Decode the result of `tasks/send`, `tasks/get` or `tasks/cancel`
    pub fn parse_task_response(&self, bytes: &[u8]) -> A2AResult<Task> {
        let result = self.non_null_result(bytes, "Task")?;
        Task::decode(result)
    }

    /// Decode the result of `tasks/pushNotification/set` or `/get`
    pub fn parse_push_notification_response(
        &self,
        bytes: &[u8],
    ) -> A2AResult<TaskPushNotificationConfig> {
        let result = self.non_null_result(bytes, "TaskPushNotificationConfig")?;
        TaskPushNotificationConfig::decode(result)
    }

    /// Decode one event of a `tasks/sendSubscribe` or `tasks/resubscribe` stream
    pub fn parse_stream_event(&self, bytes: &[u8]) -> A2AResult<StreamEvent> {
        let result = self.non_null_result(bytes, "stream event")?;
        StreamEvent::from_value(result)
    }

    /// Decode a stream event that must be a status update
    pub fn parse_status_update(&self, bytes: &[u8]) -> A2AResult<TaskStatusUpdateEvent> {
        match self.parse_stream_event(bytes)? {
            StreamEvent::Status(event) => Ok(event),
            StreamEvent::Artifact(_) => Err(A2AError::InvalidParams(
                "expected a status update, got an artifact update".into(),
            )),
        }
    }

    /// Decode a stream event that must be an artifact update
    pub fn parse_artifact_update(&self, bytes: &[u8]) -> A2AResult<TaskArtifactUpdateEvent> {
        match self.parse_stream_event(bytes)? {
            StreamEvent::Artifact(event) => Ok(event),
            StreamEvent::Status(_) => Err(A2AError::InvalidParams(
                "expected an artifact update, got a status update".into(),
            )),
        }
    }

    fn parse_envelope(&self, bytes: &[u8]) -> A2AResult<JsonRpcResponse> {
        let response = JsonRpcResponse::from_slice(bytes, self.version_policy)?;
        if let Some(error) = response.error() {
            debug!(code = error.code, message = %error.message, "Remote error response");
        }
        Ok(response)
    }

    fn non_null_result(&self, bytes: &[u8], expected: &str) -> A2AResult<Value> {
        match self.parse_envelope(bytes)?.into_result()? {
            Some(result) if !result.is_null() => Ok(result),
            _ => Err(A2AError::InvalidParams(format!(
                "response carries no result, expected {expected}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::protocol::{
        error::JsonRpcError,
        message::Message,
        push::PushNotificationConfig,
        task::TaskState,
    };

    fn envelope(body: Value) -> Vec<u8> {
        serde_json::to_vec(&body).unwrap()
    }

    #[test]
    fn test_builders_set_method_literals() {
        let protocol = A2AProtocol::new();
        let id = || RequestId::from("1");
        let send = TaskSendParams::new("t", Message::user("hi"));

        assert_eq!(protocol.send_task(id(), send.clone()).method, "tasks/send");
        assert_eq!(protocol.get_task(id(), TaskQueryParams::new("t")).method, "tasks/get");
        assert_eq!(protocol.cancel_task(id(), TaskIdParams::new("t")).method, "tasks/cancel");
        assert_eq!(
            protocol.send_task_subscribe(id(), send).method,
            "tasks/sendSubscribe"
        );
        assert_eq!(
            protocol.resubscribe(id(), TaskQueryParams::new("t")).method,
            "tasks/resubscribe"
        );
        assert_eq!(
            protocol
                .set_push_notification(
                    id(),
                    TaskPushNotificationConfig::new("t", PushNotificationConfig::new("https://x"))
                )
                .method,
            "tasks/pushNotification/set"
        );
        assert_eq!(
            protocol.get_push_notification(id(), TaskIdParams::new("t")).jsonrpc,
            "2.0"
        );
    }

    #[test]
    fn test_parse_task_response() {
        let bytes = envelope(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "id": "task-1",
                "status": {"state": "completed", "timestamp": "2025-01-01T00:00:00Z"}
            }
        }));
        let task = A2AProtocol::new().parse_task_response(&bytes).unwrap();

        assert_eq!(task.id, "task-1");
        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[test]
    fn test_remote_error_kept_whole() {
        let bytes = envelope(json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "error": {"code": -32001, "message": "Task not found", "data": {"id": "task-x"}}
        }));
        let err = A2AProtocol::new().parse_task_response(&bytes).unwrap_err();

        assert_eq!(
            err.as_rpc(),
            Some(&JsonRpcError::task_not_found().with_data(json!({"id": "task-x"})))
        );
    }

    #[test]
    fn test_error_wins_over_result() {
        let bytes = envelope(json!({
            "jsonrpc": "2.0",
            "result": {"id": "task-1", "status": {"state": "working", "timestamp": "2025-01-01T00:00:00Z"}},
            "error": {"code": -32603, "message": "Internal error"}
        }));
        let err = A2AProtocol::new().parse_task_response(&bytes).unwrap_err();
        assert_eq!(err.code(), Some(-32603));
    }

    #[test]
    fn test_missing_result() {
        let bytes = envelope(json!({"jsonrpc": "2.0", "id": 1}));
        let protocol = A2AProtocol::new();

        let value: Value = protocol.parse_response(&bytes).unwrap();
        assert!(value.is_null());
        assert!(matches!(
            protocol.parse_task_response(&bytes),
            Err(A2AError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_version_policy() {
        let bytes = envelope(json!({"jsonrpc": "1.0", "id": 1, "result": null}));

        let strict = A2AProtocol::new().parse_response::<Value>(&bytes);
        assert!(matches!(strict, Err(A2AError::InvalidRequest(_))));

        let lenient = A2AProtocol::with_version_policy(VersionPolicy::Lenient)
            .parse_response::<Value>(&bytes);
        assert!(lenient.is_ok());
    }

    #[test]
    fn test_parse_stream_events() {
        let protocol = A2AProtocol::new();
        let status = envelope(json!({
            "jsonrpc": "2.0",
            "result": {
                "id": "task-1",
                "status": {"state": "working", "timestamp": "2025-01-01T00:00:00Z"},
                "final": false
            }
        }));
        let artifact = envelope(json!({
            "jsonrpc": "2.0",
            "result": {"id": "task-1", "artifact": {"parts": [{"type": "text", "text": "A"}]}}
        }));

        assert!(protocol.parse_status_update(&status).is_ok());
        assert!(protocol.parse_artifact_update(&artifact).is_ok());
        assert!(protocol.parse_status_update(&artifact).is_err());
        assert!(matches!(
            protocol.parse_stream_event(&status).unwrap(),
            StreamEvent::Status(_)
        ));
    }

    #[test]
    fn test_parse_push_notification_response() {
        let bytes = envelope(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "result": {"id": "task-1", "pushNotificationConfig": {"url": "https://hooks.example.com"}}
        }));
        let config = A2AProtocol::new()
            .parse_push_notification_response(&bytes)
            .unwrap();
        assert_eq!(config.push_notification_config.url, "https://hooks.example.com");
    }

    #[test]
    fn test_fractional_and_large_ids_accepted() {
        let protocol = A2AProtocol::new();
        for id in [json!(1.5), json!(u64::MAX)] {
            let bytes = envelope(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {"id": "task-1", "status": {"state": "working", "timestamp": "2025-01-01T00:00:00Z"}}
            }));
            assert_eq!(protocol.parse_task_response(&bytes).unwrap().id, "task-1");
        }
    }

    #[test]
    fn test_unknown_part_nested_in_task() {
        let bytes = envelope(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "id": "task-1",
                "status": {"state": "completed", "timestamp": "2025-01-01T00:00:00Z"},
                "artifacts": [{"parts": [{"type": "text", "text": "ok"}, {"type": "vid`eo"}]}]
            }
        }));

        match A2AProtocol::new().parse_task_response(&bytes) {
            Err(A2AError::UnknownPartType(tag)) => assert_eq!(tag, "vid`eo"),
            other => panic!("Expected UnknownPartType, got {:?}", other),
        }
    }

    #[test]
    fn test_shape_error_naming_part_type_is_not_unknown_part() {
        let bytes = envelope(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "id": "task-1",
                "status": {"state": "working", "timestamp": "2025-01-01T00:00:00Z"},
                "history": [{"role": "unknown part type `video`", "parts": [{"type": "text", "text": "x"}]}]
            }
        }));

        assert!(matches!(
            A2AProtocol::new().parse_task_response(&bytes),
            Err(A2AError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_unknown_part_in_stream_events() {
        let protocol = A2AProtocol::new();
        let artifact = envelope(json!({
            "jsonrpc": "2.0",
            "result": {"id": "task-1", "artifact": {"parts": [{"type": "audio"}]}}
        }));
        let status = envelope(json!({
            "jsonrpc": "2.0",
            "result": {
                "id": "task-1",
                "status": {
                    "state": "input-required",
                    "timestamp": "2025-01-01T00:00:00Z",
                    "message": {"role": "agent", "parts": [{"type": "form"}]}
                }
            }
        }));

        assert!(matches!(
            protocol.parse_stream_event(&artifact),
            Err(A2AError::UnknownPartType(tag)) if tag == "audio"
        ));
        assert!(matches!(
            protocol.parse_stream_event(&status),
            Err(A2AError::UnknownPartType(tag)) if tag == "form"
        ));
    }

    #[test]
    fn test_malformed_bytes() {
        let err = A2AProtocol::new().parse_task_response(b"{oops").unwrap_err();
        assert_eq!(err.code(), Some(-32700));
    }
}
