//! Validation layer for A2A protocol requests and responses

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;
use tracing::warn;

use crate::{
    protocol::{
        error::{A2AError, ValidationError},
        operation::A2AOperation,
        params::validate_id,
    },
    service::{A2ARequest, A2AResponse},
};

/// Layer that validates A2A protocol requests and responses
///
/// Outgoing operations are always checked. Returned tasks and push
/// configurations are checked only when response validation is enabled.
#[derive(Clone, Debug)]
pub struct A2AValidationLayer {
    validate_responses: bool,
}

impl A2AValidationLayer {
    /// Create a new validation layer that also checks responses
    pub fn new() -> Self {
        Self {
            validate_responses: true,
        }
    }

    /// Enable or disable response validation
    pub fn with_response_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }
}

impl Default for A2AValidationLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService {
            inner,
            validate_responses: self.validate_responses,
        }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone, Debug)]
pub struct A2AValidationService<S> {
    inner: S,
    validate_responses: bool,
}

impl<S> A2AValidationService<S> {
    /// Validate an A2A request
    fn validate_request(req: &A2ARequest) -> Result<(), ValidationError> {
        match &req.operation {
            A2AOperation::SendTask(params) | A2AOperation::SendTaskSubscribe(params) => {
                params.validate()?
            }
            A2AOperation::GetTask(params) | A2AOperation::Resubscribe(params) => {
                validate_id(&params.id)?
            }
            A2AOperation::CancelTask(params) | A2AOperation::GetPushNotification(params) => {
                validate_id(&params.id)?
            }
            A2AOperation::SetPushNotification(config) => {
                validate_id(&config.id)?;
                config.push_notification_config.parsed_url()?;
            }
        }

        Ok(())
    }

    /// Validate an A2A response
    fn validate_response(resp: &A2AResponse) -> Result<(), ValidationError> {
        match resp {
            A2AResponse::Task(task) => {
                validate_id(&task.id)?;
                task.history.iter().try_for_each(|m| m.validate())?;
                task.artifacts.iter().try_for_each(|a| a.validate())?;
                if let Some(message) = &task.status.message {
                    message.validate()?;
                }
            }
            A2AResponse::PushNotificationConfig(config) => {
                validate_id(&config.id)?;
                config.push_notification_config.parsed_url()?;
            }
            // Events are checked by the tracker they are applied to
            A2AResponse::Stream(_) => {}
        }

        Ok(())
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        if let Err(e) = Self::validate_request(&req) {
            warn!(method = %req.operation.method(), field = e.field(), "Rejected request: {}", e);
            return Box::pin(async move { Err(A2AError::from(e)) });
        }

        let validate_responses = self.validate_responses;
        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(req).await?;

            if validate_responses {
                Self::validate_response(&response)?;
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::{
        codec::JsonRpcCodec,
        protocol::{
            artifact::Artifact,
            message::Message,
            params::{TaskIdParams, TaskQueryParams, TaskSendParams},
            part::{FileContent, FilePart, Part},
            push::{PushNotificationConfig, TaskPushNotificationConfig},
            task::Task,
        },
        service::{A2AProtocolService, RequestContext},
        transport::{mock::MockTransport, TransportResponse},
    };

    use super::*;

    fn request(operation: A2AOperation) -> A2ARequest {
        A2ARequest::new(operation, RequestContext::new("https://example.com"))
    }

    fn bad_file_part() -> Part {
        Part::File(FilePart {
            file: FileContent {
                bytes: Some("YWJj".into()),
                uri: Some("https://example.com/a".into()),
                ..FileContent::default()
            },
            metadata: None,
        })
    }

    #[test]
    fn test_validate_send_task() {
        let req = request(A2AOperation::SendTask(TaskSendParams::new(
            "task-1",
            Message::user("Hello"),
        )));
        assert!(A2AValidationService::<()>::validate_request(&req).is_ok());
    }

    #[test]
    fn test_validate_empty_message() {
        let mut message = Message::user("Test");
        message.parts.clear();

        let req = request(A2AOperation::SendTask(TaskSendParams::new("task-1", message)));
        assert_eq!(
            A2AValidationService::<()>::validate_request(&req),
            Err(ValidationError::EmptyParts { field: "parts" })
        );
    }

    #[test]
    fn test_validate_file_invariant() {
        let message = Message::user("see file").with_part(bad_file_part());
        let req = request(A2AOperation::SendTaskSubscribe(TaskSendParams::new(
            "task-1", message,
        )));
        assert_eq!(
            A2AValidationService::<()>::validate_request(&req),
            Err(ValidationError::FileBytesAndUri)
        );
    }

    #[test]
    fn test_validate_task_id_and_push_url() {
        let req = request(A2AOperation::GetTask(TaskQueryParams::new("")));
        assert!(A2AValidationService::<()>::validate_request(&req).is_err());

        let req = request(A2AOperation::SetPushNotification(
            TaskPushNotificationConfig::new("task-1", PushNotificationConfig::new("::bad::")),
        ));
        assert!(matches!(
            A2AValidationService::<()>::validate_request(&req),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_task_response() {
        let task = Task::new("task-123");
        let response = A2AResponse::Task(Box::new(task));
        assert!(A2AValidationService::<()>::validate_response(&response).is_ok());

        let mut task = Task::new("task-123");
        task.add_artifact(Artifact::new(vec![bad_file_part()]));
        let response = A2AResponse::Task(Box::new(task));
        assert!(A2AValidationService::<()>::validate_response(&response).is_err());
    }

    #[test]
    fn test_invalid_request_never_reaches_transport() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let transport = MockTransport::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            TransportResponse::new(200)
        });
        let inner = A2AProtocolService::new(transport, Arc::new(JsonRpcCodec::new()));
        let mut service = A2AValidationLayer::new().layer(inner);

        let req = request(A2AOperation::CancelTask(TaskIdParams::new("")));
        let result = tokio_test::block_on(service.call(req));

        assert!(matches!(result, Err(A2AError::Validation(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
