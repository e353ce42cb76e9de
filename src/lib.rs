//! # Tower A2A RPC
//!
//! Typed JSON-RPC wire model for the Agent2Agent (A2A) task protocol, with a
//! Tower-based client on top.
//!
//! The [`protocol`] module holds the wire types: the error catalog, request
//! and response envelopes, the content part union, messages, tasks and their
//! update events, and a façade that builds and parses the seven task
//! methods. Everything above it is plumbing to move those values over HTTP.
//!
//! ## Features
//!
//! - **Exact wire shapes**: camelCase members, tagged parts, optional fields omitted
//! - **Stream merging**: [`TaskTracker`](protocol::TaskTracker) folds update events into a task
//! - **Composable Middleware**: validation as a Tower layer
//! - **Transport Agnostic**: HTTP with SSE streaming, or any custom [`Transport`](transport::Transport)
//!
//! ## Example
//!
//! ```rust,no_run
//! use tower_a2a_rpc::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "https://agent.example.com/a2a".parse()?;
//!     let mut client = A2AClientBuilder::new_http(url)
//!         .with_header("Authorization", "Bearer token123")
//!         .with_timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let task = client
//!         .track(TaskSendParams::new("task-1", Message::user("Summarize the report")))
//!         .await?;
//!     println!("{} finished as {}", task.id, task.status.state);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod layer;
pub mod protocol;
pub mod service;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{A2AClientBuilder, AgentClient, ClientConfig},
        codec::{Codec, JsonRpcCodec, SseCodec},
        layer::A2AValidationLayer,
        protocol::{
            A2AError, A2AMethod, A2AOperation, A2AProtocol, A2AResult, Artifact, FileContent,
            LifecyclePolicy, Message, Part, PushNotificationConfig, Role, StreamEvent,
            TaskIdParams, TaskPushNotificationConfig, TaskQueryParams, TaskSendParams,
            TaskState, TaskStatus, TaskTracker, Task, VersionPolicy,
        },
        service::{A2ARequest, A2AResponse, RequestContext},
        transport::{HttpTransport, Transport},
    };
}
