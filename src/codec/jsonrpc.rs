//! JSON-RPC 2.0 codec for A2A protocol
//!
//! Wraps each operation in a request envelope with a fresh id and decodes the
//! response through [`A2AProtocol`].

use bytes::Bytes;
use futures::stream;
use tracing::trace;

use crate::{
    codec::Codec,
    protocol::{
        error::A2AError,
        jsonrpc::{RequestId, VersionPolicy},
        operation::{A2AMethod, A2AOperation},
        rpc::A2AProtocol,
    },
    service::response::A2AResponse,
};

/// JSON-RPC 2.0 codec
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec {
    protocol: A2AProtocol,
}

impl JsonRpcCodec {
    /// Create a codec with the strict version policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec checking `jsonrpc` with `policy`
    pub fn with_version_policy(policy: VersionPolicy) -> Self {
        Self {
            protocol: A2AProtocol::with_version_policy(policy),
        }
    }

    /// The façade used for decoding
    pub fn protocol(&self) -> A2AProtocol {
        self.protocol
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        let request = operation.into_request(RequestId::generate())?;
        trace!(method = %request.method, id = ?request.id, "Encoding request");
        Ok(Bytes::from(request.to_vec()?))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        match operation.method() {
            A2AMethod::SendTask | A2AMethod::GetTask | A2AMethod::CancelTask => {
                let task = self.protocol.parse_task_response(body)?;
                Ok(A2AResponse::Task(Box::new(task)))
            }
            A2AMethod::SetPushNotification | A2AMethod::GetPushNotification => {
                let config = self.protocol.parse_push_notification_response(body)?;
                Ok(A2AResponse::PushNotificationConfig(config))
            }
            // A streaming method answered with a single JSON body
            A2AMethod::SendTaskSubscribe | A2AMethod::Resubscribe => {
                let event = self.protocol.parse_stream_event(body)?;
                Ok(A2AResponse::Stream(Box::pin(stream::iter([Ok::<_, A2AError>(event)]))))
            }
        }
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use serde_json::{json, Value};

    use super::*;
    use crate::protocol::{
        message::Message,
        params::{TaskIdParams, TaskQueryParams, TaskSendParams},
    };

    fn get_task() -> A2AOperation {
        A2AOperation::GetTask(TaskQueryParams::new("task-123"))
    }

    #[test]
    fn test_encode_send_task() {
        let codec = JsonRpcCodec::new();
        let operation =
            A2AOperation::SendTask(TaskSendParams::new("task-1", Message::user("Hello")));

        let bytes = codec.encode_request(&operation).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "tasks/send");
        assert_eq!(json["params"]["id"], "task-1");
        assert_eq!(json["params"]["message"]["parts"][0]["type"], "text");
        assert!(json["id"].is_string());
    }

    #[test]
    fn test_each_request_gets_a_fresh_id() {
        let codec = JsonRpcCodec::new();
        let a: Value = serde_json::from_slice(&codec.encode_request(&get_task()).unwrap()).unwrap();
        let b: Value = serde_json::from_slice(&codec.encode_request(&get_task()).unwrap()).unwrap();
        assert_ne!(a["id"], b["id"]);
    }

    #[test]
    fn test_decode_task_response() {
        let codec = JsonRpcCodec::new();
        let body = json!({
            "jsonrpc": "2.0",
            "id": "req-123",
            "result": {
                "id": "task-123",
                "status": {"state": "submitted", "timestamp": "2024-01-01T00:00:00Z"}
            }
        })
        .to_string();

        match codec.decode_response(body.as_bytes(), &get_task()).unwrap() {
            A2AResponse::Task(task) => assert_eq!(task.id, "task-123"),
            other => panic!("Expected Task response, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_response() {
        let codec = JsonRpcCodec::new();
        let body = r#"{
            "jsonrpc": "2.0",
            "error": {"code": -32002, "message": "Task cannot be canceled"},
            "id": "req-123"
        }"#;
        let operation = A2AOperation::CancelTask(TaskIdParams::new("task-123"));

        match codec.decode_response(body.as_bytes(), &operation) {
            Err(A2AError::Rpc(error)) => {
                assert_eq!(error.code, -32002);
                assert_eq!(error.message, "Task cannot be canceled");
            }
            other => panic!("Expected Rpc error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_result() {
        let codec = JsonRpcCodec::new();
        let result = codec.decode_response(br#"{"jsonrpc": "2.0", "id": "1"}"#, &get_task());
        assert!(matches!(result, Err(A2AError::InvalidParams(_))));
    }

    #[test]
    fn test_lenient_codec_accepts_other_versions() {
        let body = br#"{"jsonrpc": "1.0", "id": "1", "result": {"id": "t", "status": {"state": "working", "timestamp": "2024-01-01T00:00:00Z"}}}"#;

        assert!(JsonRpcCodec::new().decode_response(body, &get_task()).is_err());
        assert!(JsonRpcCodec::with_version_policy(VersionPolicy::Lenient)
            .decode_response(body, &get_task())
            .is_ok());
    }

    #[tokio::test]
    async fn test_streaming_method_with_plain_body() {
        let codec = JsonRpcCodec::new();
        let body = br#"{"jsonrpc": "2.0", "id": "1", "result": {"id": "t", "status": {"state": "completed", "timestamp": "2024-01-01T00:00:00Z"}, "final": true}}"#;
        let operation = A2AOperation::Resubscribe(TaskQueryParams::new("t"));

        let A2AResponse::Stream(mut events) = codec.decode_response(body, &operation).unwrap()
        else {
            panic!("Expected Stream response");
        };
        let event = events.next().await.unwrap().unwrap();
        assert!(event.is_final());
        assert!(events.next().await.is_none());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(JsonRpcCodec::new().content_type(), "application/json");
    }
}
