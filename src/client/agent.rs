//! High-level A2A agent client

use std::time::Duration;

use futures::StreamExt;
use tower::ServiceExt;
use tower_service::Service;
use tracing::{debug, info};

use crate::{
    client::config::ClientConfig,
    protocol::{
        error::{A2AError, A2AResult},
        operation::A2AOperation,
        params::{TaskIdParams, TaskQueryParams, TaskSendParams},
        push::TaskPushNotificationConfig,
        stream::{TaskTracker, TransitionPolicy},
        task::Task,
    },
    service::{response::EventStream, A2ARequest, A2AResponse, RequestContext},
};

/// High-level A2A client for interacting with agents
///
/// This client wraps a Tower service and provides one method per protocol
/// method, plus polling and stream tracking helpers.
///
/// # Example
///
/// ```rust,no_run
/// use tower_a2a_rpc::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "https://agent.example.com/a2a".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url).build()?;
///
/// let params = TaskSendParams::new("task-1", Message::user("Hello, agent!"));
/// let task = client.track(params).await?;
/// println!("Task {} finished as {}", task.id, task.status.state);
/// # Ok(())
/// # }
/// ```
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new agent client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a request context from the client configuration
    fn build_context(&self) -> RequestContext {
        RequestContext {
            agent_url: self.config.agent_url.clone(),
            timeout: Some(self.config.timeout),
            headers: self.config.headers.clone(),
        }
    }

    async fn call(&mut self, operation: A2AOperation) -> A2AResult<A2AResponse> {
        debug!(method = %operation.method(), task_id = operation.task_id(), "A2A call");
        let request = A2ARequest::new(operation, self.build_context());
        self.service.ready().await?.call(request).await
    }

    async fn call_for_task(&mut self, operation: A2AOperation) -> A2AResult<Task> {
        let method = operation.method();
        match self.call(operation).await? {
            A2AResponse::Task(task) => Ok(*task),
            other => Err(A2AError::UnexpectedResponse(format!(
                "{} answered with a {}",
                method,
                other.kind()
            ))),
        }
    }

    async fn call_for_push_config(
        &mut self,
        operation: A2AOperation,
    ) -> A2AResult<TaskPushNotificationConfig> {
        let method = operation.method();
        match self.call(operation).await? {
            A2AResponse::PushNotificationConfig(config) => Ok(config),
            other => Err(A2AError::UnexpectedResponse(format!(
                "{} answered with a {}",
                method,
                other.kind()
            ))),
        }
    }

    async fn call_for_stream(&mut self, operation: A2AOperation) -> A2AResult<EventStream> {
        let method = operation.method();
        match self.call(operation).await? {
            A2AResponse::Stream(events) => Ok(events),
            other => Err(A2AError::UnexpectedResponse(format!(
                "{} answered with a {}",
                method,
                other.kind()
            ))),
        }
    }

    /// Send a message to a task (`tasks/send`)
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the agent answers with a
    /// JSON-RPC error, or the response is not a task.
    pub async fn send_task(&mut self, params: TaskSendParams) -> A2AResult<Task> {
        self.call_for_task(A2AOperation::SendTask(params)).await
    }

    /// Fetch a task (`tasks/get`)
    pub async fn get_task(&mut self, params: TaskQueryParams) -> A2AResult<Task> {
        self.call_for_task(A2AOperation::GetTask(params)).await
    }

    /// Request cancellation of a task (`tasks/cancel`)
    pub async fn cancel_task(&mut self, task_id: impl Into<String>) -> A2AResult<Task> {
        self.call_for_task(A2AOperation::CancelTask(TaskIdParams::new(task_id)))
            .await
    }

    /// Send a message and stream the task's updates (`tasks/sendSubscribe`)
    pub async fn send_task_subscribe(&mut self, params: TaskSendParams) -> A2AResult<EventStream> {
        self.call_for_stream(A2AOperation::SendTaskSubscribe(params))
            .await
    }

    /// Re-attach to a task's update stream (`tasks/resubscribe`)
    pub async fn resubscribe(&mut self, params: TaskQueryParams) -> A2AResult<EventStream> {
        self.call_for_stream(A2AOperation::Resubscribe(params)).await
    }

    /// Register push delivery for a task (`tasks/pushNotification/set`)
    pub async fn set_push_notification(
        &mut self,
        config: TaskPushNotificationConfig,
    ) -> A2AResult<TaskPushNotificationConfig> {
        self.call_for_push_config(A2AOperation::SetPushNotification(config))
            .await
    }

    /// Read a task's push configuration (`tasks/pushNotification/get`)
    pub async fn get_push_notification(
        &mut self,
        task_id: impl Into<String>,
    ) -> A2AResult<TaskPushNotificationConfig> {
        self.call_for_push_config(A2AOperation::GetPushNotification(TaskIdParams::new(task_id)))
            .await
    }

    /// Poll a task until it reaches a terminal state
    ///
    /// Also returns as soon as the agent waits for input, since no amount of
    /// polling moves the task on from there.
    ///
    /// # Arguments
    ///
    /// * `task_id` - The task ID to poll
    /// * `poll_interval` - Pause between polls
    /// * `max_attempts` - Maximum number of polling attempts (0 = unlimited)
    pub async fn poll_until_terminal(
        &mut self,
        task_id: impl Into<String>,
        poll_interval: Duration,
        max_attempts: usize,
    ) -> A2AResult<Task> {
        let task_id = task_id.into();
        let mut attempts = 0;

        loop {
            let task = self.get_task(TaskQueryParams::new(task_id.clone())).await?;

            if task.is_terminal() || task.requires_input() {
                return Ok(task);
            }

            attempts += 1;
            if max_attempts > 0 && attempts >= max_attempts {
                return Err(A2AError::Timeout);
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Send a message over `tasks/sendSubscribe` and assemble the task from
    /// its update stream
    ///
    /// The sent message opens the task's history. Returns once the final
    /// status arrives or the stream ends.
    pub async fn track(&mut self, params: TaskSendParams) -> A2AResult<Task> {
        let mut task = Task::new(params.id.clone());
        if let Some(session_id) = &params.session_id {
            task = task.with_session_id(session_id.clone());
        }
        task.add_to_history(params.message.clone());

        let events = self.send_task_subscribe(params).await?;
        drive(TaskTracker::new(task), events).await
    }
}

/// Apply every event of `events` to `tracker` until the final status
///
/// The first rejected event aborts tracking with its error.
pub async fn drive<P: TransitionPolicy>(
    mut tracker: TaskTracker<P>,
    mut events: EventStream,
) -> A2AResult<Task> {
    while let Some(event) = events.next().await {
        tracker.apply(event?)?;
        if tracker.is_final() {
            break;
        }
    }

    let task = tracker.into_task();
    info!(task_id = %task.id, state = %task.status.state, artifacts = task.artifacts.len(), "Task stream finished");
    Ok(task)
}
