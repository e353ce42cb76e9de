//! A2A service response types

use std::{fmt, pin::Pin};

use futures::Stream;

use crate::protocol::{
    error::A2AResult, push::TaskPushNotificationConfig, stream::StreamEvent, task::Task,
};

/// Events of a `tasks/sendSubscribe` or `tasks/resubscribe` call, in arrival order
pub type EventStream = Pin<Box<dyn Stream<Item = A2AResult<StreamEvent>> + Send>>;

/// Response from an A2A service operation
pub enum A2AResponse {
    /// Task response (from `tasks/send`, `tasks/get`, `tasks/cancel`)
    Task(Box<Task>),

    /// Push configuration (from `tasks/pushNotification/set` and `/get`)
    PushNotificationConfig(TaskPushNotificationConfig),

    /// Update stream (from `tasks/sendSubscribe` and `tasks/resubscribe`)
    Stream(EventStream),
}

impl A2AResponse {
    /// Extract a task from the response, if present
    pub fn into_task(self) -> Option<Task> {
        match self {
            A2AResponse::Task(task) => Some(*task),
            _ => None,
        }
    }

    /// Extract a push configuration from the response, if present
    pub fn into_push_notification_config(self) -> Option<TaskPushNotificationConfig> {
        match self {
            A2AResponse::PushNotificationConfig(config) => Some(config),
            _ => None,
        }
    }

    /// Extract an event stream from the response, if present
    pub fn into_stream(self) -> Option<EventStream> {
        match self {
            A2AResponse::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    /// Short name of the response kind
    pub fn kind(&self) -> &'static str {
        match self {
            A2AResponse::Task(_) => "task",
            A2AResponse::PushNotificationConfig(_) => "push notification config",
            A2AResponse::Stream(_) => "event stream",
        }
    }
}

impl fmt::Debug for A2AResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A2AResponse::Task(task) => f.debug_tuple("Task").field(task).finish(),
            A2AResponse::PushNotificationConfig(config) => f
                .debug_tuple("PushNotificationConfig")
                .field(config)
                .finish(),
            A2AResponse::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
