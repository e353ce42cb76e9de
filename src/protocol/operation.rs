//! A2A protocol operations

use std::fmt;

use serde_json::Value;

use super::{
    error::{A2AError, A2AResult},
    jsonrpc::{JsonRpcRequest, RequestId},
    params::{TaskIdParams, TaskQueryParams, TaskSendParams},
    push::TaskPushNotificationConfig,
};

/// The JSON-RPC methods of the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum A2AMethod {
    /// `tasks/send`
    SendTask,
    /// `tasks/get`
    GetTask,
    /// `tasks/cancel`
    CancelTask,
    /// `tasks/sendSubscribe`
    SendTaskSubscribe,
    /// `tasks/resubscribe`
    Resubscribe,
    /// `tasks/pushNotification/set`
    SetPushNotification,
    /// `tasks/pushNotification/get`
    GetPushNotification,
}

impl A2AMethod {
    /// Every method
    pub const ALL: [A2AMethod; 7] = [
        A2AMethod::SendTask,
        A2AMethod::GetTask,
        A2AMethod::CancelTask,
        A2AMethod::SendTaskSubscribe,
        A2AMethod::Resubscribe,
        A2AMethod::SetPushNotification,
        A2AMethod::GetPushNotification,
    ];

    /// Wire name of the method
    pub fn as_str(self) -> &'static str {
        match self {
            A2AMethod::SendTask => "tasks/send",
            A2AMethod::GetTask => "tasks/get",
            A2AMethod::CancelTask => "tasks/cancel",
            A2AMethod::SendTaskSubscribe => "tasks/sendSubscribe",
            A2AMethod::Resubscribe => "tasks/resubscribe",
            A2AMethod::SetPushNotification => "tasks/pushNotification/set",
            A2AMethod::GetPushNotification => "tasks/pushNotification/get",
        }
    }

    /// Look a method up by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// Check if the method answers with an event stream
    pub fn is_streaming(self) -> bool {
        matches!(self, A2AMethod::SendTaskSubscribe | A2AMethod::Resubscribe)
    }
}

impl fmt::Display for A2AMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A2A protocol operations
///
/// One variant per method, carrying that method's typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum A2AOperation {
    /// Deliver a message to a task, creating it if needed
    SendTask(TaskSendParams),

    /// Fetch a task
    GetTask(TaskQueryParams),

    /// Request cancellation of a task
    CancelTask(TaskIdParams),

    /// Deliver a message and stream the task's updates
    SendTaskSubscribe(TaskSendParams),

    /// Re-attach to the update stream of an existing task
    Resubscribe(TaskQueryParams),

    /// Register push delivery for a task
    SetPushNotification(TaskPushNotificationConfig),

    /// Read back the push configuration of a task
    GetPushNotification(TaskIdParams),
}

impl A2AOperation {
    /// Method this operation is sent as
    pub fn method(&self) -> A2AMethod {
        match self {
            A2AOperation::SendTask(_) => A2AMethod::SendTask,
            A2AOperation::GetTask(_) => A2AMethod::GetTask,
            A2AOperation::CancelTask(_) => A2AMethod::CancelTask,
            A2AOperation::SendTaskSubscribe(_) => A2AMethod::SendTaskSubscribe,
            A2AOperation::Resubscribe(_) => A2AMethod::Resubscribe,
            A2AOperation::SetPushNotification(_) => A2AMethod::SetPushNotification,
            A2AOperation::GetPushNotification(_) => A2AMethod::GetPushNotification,
        }
    }

    /// Id of the task the operation targets
    pub fn task_id(&self) -> &str {
        match self {
            A2AOperation::SendTask(p) | A2AOperation::SendTaskSubscribe(p) => &p.id,
            A2AOperation::GetTask(p) | A2AOperation::Resubscribe(p) => &p.id,
            A2AOperation::CancelTask(p) | A2AOperation::GetPushNotification(p) => &p.id,
            A2AOperation::SetPushNotification(p) => &p.id,
        }
    }

    /// Check if this operation expects a streaming response
    pub fn is_streaming(&self) -> bool {
        self.method().is_streaming()
    }

    /// Parameters as a JSON value
    pub fn params_value(&self) -> A2AResult<Value> {
        let value = match self {
            A2AOperation::SendTask(p) | A2AOperation::SendTaskSubscribe(p) => {
                serde_json::to_value(p)
            }
            A2AOperation::GetTask(p) | A2AOperation::Resubscribe(p) => serde_json::to_value(p),
            A2AOperation::CancelTask(p) | A2AOperation::GetPushNotification(p) => {
                serde_json::to_value(p)
            }
            A2AOperation::SetPushNotification(p) => serde_json::to_value(p),
        };
        value.map_err(A2AError::Serialization)
    }

    /// Wrap the operation in a request envelope
    pub fn into_request(&self, id: RequestId) -> A2AResult<JsonRpcRequest> {
        Ok(JsonRpcRequest::new(
            Some(id),
            self.method().as_str(),
            self.params_value()?,
        ))
    }

    /// Recover an operation from an incoming request
    ///
    /// Unknown methods fail with [`A2AError::MethodNotFound`], parameters of
    /// the wrong shape with [`A2AError::InvalidParams`] (or
    /// [`A2AError::UnknownPartType`] for an unrecognised message part).
    pub fn from_request(request: &JsonRpcRequest) -> A2AResult<Self> {
        let method = A2AMethod::from_name(&request.method)
            .ok_or_else(|| A2AError::MethodNotFound(request.method.clone()))?;

        let operation = match method {
            A2AMethod::SendTask => A2AOperation::SendTask(request.decode_params()?),
            A2AMethod::GetTask => A2AOperation::GetTask(request.decode_params()?),
            A2AMethod::CancelTask => A2AOperation::CancelTask(request.decode_params()?),
            A2AMethod::SendTaskSubscribe => {
                A2AOperation::SendTaskSubscribe(request.decode_params()?)
            }
            A2AMethod::Resubscribe => A2AOperation::Resubscribe(request.decode_params()?),
            A2AMethod::SetPushNotification => {
                A2AOperation::SetPushNotification(request.decode_params()?)
            }
            A2AMethod::GetPushNotification => {
                A2AOperation::GetPushNotification(request.decode_params()?)
            }
        };
        Ok(operation)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::protocol::message::Message;

    #[test]
    fn test_method_names() {
        for method in A2AMethod::ALL {
            assert_eq!(A2AMethod::from_name(method.as_str()), Some(method));
        }
        assert_eq!(A2AMethod::from_name("tasks/list"), None);
        assert_eq!(
            A2AMethod::SetPushNotification.to_string(),
            "tasks/pushNotification/set"
        );
    }

    #[test]
    fn test_operation_streaming() {
        let op = A2AOperation::SendTaskSubscribe(TaskSendParams::new("t", Message::user("x")));
        assert!(op.is_streaming());

        let op = A2AOperation::Resubscribe(TaskQueryParams::new("t"));
        assert!(op.is_streaming());

        let op = A2AOperation::GetTask(TaskQueryParams::new("task-123"));
        assert!(!op.is_streaming());
        assert_eq!(op.task_id(), "task-123");
    }

    #[test]
    fn test_request_round_trip() {
        let op = A2AOperation::CancelTask(TaskIdParams::new("task-9"));
        let request = op.into_request(RequestId::from("req-1")).unwrap();

        assert_eq!(request.method, "tasks/cancel");
        assert_eq!(request.params, json!({"id": "task-9"}));
        assert_eq!(A2AOperation::from_request(&request).unwrap(), op);
    }

    #[test]
    fn test_from_request_unknown_method() {
        let request = JsonRpcRequest::new(None, "tasks/list", json!({}));
        assert!(matches!(
            A2AOperation::from_request(&request),
            Err(A2AError::MethodNotFound(m)) if m == "tasks/list"
        ));
    }

    #[test]
    fn test_from_request_bad_params() {
        let request = JsonRpcRequest::new(None, "tasks/get", json!({"historyLength": 1}));
        assert!(matches!(
            A2AOperation::from_request(&request),
            Err(A2AError::InvalidParams(_))
        ));

        let request = JsonRpcRequest::new(
            None,
            "tasks/send",
            json!({
                "id": "t",
                "message": {"role": "user", "parts": [{"type": "video"}]}
            }),
        );
        assert!(matches!(
            A2AOperation::from_request(&request),
            Err(A2AError::UnknownPartType(tag)) if tag == "video"
        ));
    }
}
