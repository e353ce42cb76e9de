//! Core A2A protocol types and definitions

pub mod artifact;
pub mod error;
pub mod jsonrpc;
pub mod message;
pub mod operation;
pub mod params;
pub mod part;
pub mod push;
pub mod rpc;
pub mod stream;
pub mod task;

pub use artifact::Artifact;
pub use error::{A2AError, A2AResult, ErrorCode, JsonRpcError, ValidationError};
pub use jsonrpc::{
    check_version, JsonRpcRequest, JsonRpcResponse, RequestId, VersionPolicy, JSONRPC_VERSION,
};
pub use message::{Message, MessageBuilder, Role};
pub use operation::{A2AMethod, A2AOperation};
pub use params::{TaskIdParams, TaskQueryParams, TaskSendParams};
pub use part::{DataPart, FileContent, FilePart, Metadata, Part, PartKind, TextPart};
pub use push::{AuthenticationInfo, PushNotificationConfig, TaskPushNotificationConfig};
pub use rpc::A2AProtocol;
pub use stream::{LifecyclePolicy, PermissivePolicy, StreamEvent, TaskTracker, TransitionPolicy};
pub use task::{Task, TaskArtifactUpdateEvent, TaskState, TaskStatus, TaskStatusUpdateEvent};
