//! Error types for A2A protocol operations
//!
//! Two layers live here. [`ErrorCode`] and [`JsonRpcError`] are the wire-level
//! catalog that both peers must agree on. [`A2AError`] is what this crate
//! returns from fallible calls; every variant maps back onto a catalog code
//! through [`A2AError::to_rpc_error`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::task::TaskState;

/// Fixed table of JSON-RPC and A2A error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid JSON was received
    ParseError,
    /// The JSON sent is not a valid request object
    InvalidRequest,
    /// The method does not exist or is not available
    MethodNotFound,
    /// Invalid method parameters
    InvalidParams,
    /// Internal JSON-RPC error
    InternalError,
    /// The referenced task does not exist
    TaskNotFound,
    /// The task is in a state that cannot be canceled
    TaskNotCancelable,
    /// The agent does not deliver push notifications
    PushNotificationNotSupported,
    /// The agent does not implement the requested operation
    UnsupportedOperation,
}

impl ErrorCode {
    /// Every catalog entry, in wire-table order
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::ParseError,
        ErrorCode::InvalidRequest,
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::InternalError,
        ErrorCode::TaskNotFound,
        ErrorCode::TaskNotCancelable,
        ErrorCode::PushNotificationNotSupported,
        ErrorCode::UnsupportedOperation,
    ];

    /// Numeric wire code
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::TaskNotFound => -32001,
            ErrorCode::TaskNotCancelable => -32002,
            ErrorCode::PushNotificationNotSupported => -32003,
            ErrorCode::UnsupportedOperation => -32004,
        }
    }

    /// Canonical message sent when the caller supplies none
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Invalid JSON payload",
            ErrorCode::InvalidRequest => "Request payload validation error",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid parameters",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::TaskNotFound => "Task not found",
            ErrorCode::TaskNotCancelable => "Task cannot be canceled",
            ErrorCode::PushNotificationNotSupported => "Push Notification is not supported",
            ErrorCode::UnsupportedOperation => "This operation is not supported",
        }
    }

    /// Look up a catalog entry by its numeric code
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|entry| entry.code() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.default_message(), self.code())
    }
}

/// JSON-RPC 2.0 error object
///
/// Carried whole from the wire to the caller so that programmatic branching on
/// `code` stays possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("JSON-RPC error {code}: {message}")]
pub struct JsonRpcError {
    /// Numeric error code, normally one of [`ErrorCode`]
    pub code: i32,

    /// Human-readable description
    pub message: String,

    /// Optional structured diagnostic payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create an error with an arbitrary code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error from a catalog entry with its default message
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code.code(), code.default_message())
    }

    /// Attach structured diagnostic data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Catalog entry for this error, if the code is a known one
    pub fn kind(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }

    /// `-32700` Invalid JSON payload
    pub fn parse_error() -> Self {
        Self::from_code(ErrorCode::ParseError)
    }

    /// `-32600` Request payload validation error
    pub fn invalid_request() -> Self {
        Self::from_code(ErrorCode::InvalidRequest)
    }

    /// `-32601` Method not found
    pub fn method_not_found() -> Self {
        Self::from_code(ErrorCode::MethodNotFound)
    }

    /// `-32602` Invalid parameters
    pub fn invalid_params() -> Self {
        Self::from_code(ErrorCode::InvalidParams)
    }

    /// `-32603` Internal error
    pub fn internal_error() -> Self {
        Self::from_code(ErrorCode::InternalError)
    }

    /// `-32001` Task not found
    pub fn task_not_found() -> Self {
        Self::from_code(ErrorCode::TaskNotFound)
    }

    /// `-32002` Task cannot be canceled
    pub fn task_not_cancelable() -> Self {
        Self::from_code(ErrorCode::TaskNotCancelable)
    }

    /// `-32003` Push Notification is not supported
    pub fn push_notification_not_supported() -> Self {
        Self::from_code(ErrorCode::PushNotificationNotSupported)
    }

    /// `-32004` This operation is not supported
    pub fn unsupported_operation() -> Self {
        Self::from_code(ErrorCode::UnsupportedOperation)
    }
}

impl From<ErrorCode> for JsonRpcError {
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code)
    }
}

/// Structural invariant violation, naming the offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A file part carries inline bytes and a URI at the same time
    #[error("file content sets both `bytes` and `uri`")]
    FileBytesAndUri,

    /// A file part carries neither inline bytes nor a URI
    #[error("file content sets neither `bytes` nor `uri`")]
    FileMissingContent,

    /// A required string is empty
    #[error("`{field}` must not be empty")]
    EmptyField { field: &'static str },

    /// A part list that must be non-empty is empty
    #[error("`{field}` must contain at least one part")]
    EmptyParts { field: &'static str },

    /// A URL field does not parse
    #[error("`{field}` is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
}

impl ValidationError {
    /// Name of the field that violated the invariant
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::FileBytesAndUri | ValidationError::FileMissingContent => "file",
            ValidationError::EmptyField { field }
            | ValidationError::EmptyParts { field }
            | ValidationError::InvalidUrl { field, .. } => field,
        }
    }
}

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// Payload is not valid JSON
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Envelope is malformed or carries the wrong protocol version
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested method is not part of the protocol
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Payload does not have the shape the method requires
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Content part discriminator is not one of `text`, `file`, `data`
    #[error("Unknown part type: {0}")]
    UnknownPartType(String),

    /// A structural invariant does not hold
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The remote peer answered with a JSON-RPC error
    #[error(transparent)]
    Rpc(#[from] JsonRpcError),

    /// An artifact update arrived for an index whose stream was already closed
    #[error("Artifact stream {index} is already closed")]
    ArtifactStreamClosed { index: i64 },

    /// An event arrived after the final status update for the task
    #[error("Update stream for task {task_id} already delivered its final event")]
    StreamFinished { task_id: String },

    /// An event addressed to a different task
    #[error("Event for task {actual} applied to task {expected}")]
    TaskMismatch { expected: String, actual: String },

    /// The transition policy rejected a status change
    #[error("Invalid task transition from {from} to {to}")]
    InvalidTransition { from: TaskState, to: TaskState },

    /// Transport-level error (network, connection, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Encoding a value to JSON failed
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Request timeout error
    #[error("Request timeout")]
    Timeout,

    /// The peer returned a well-formed response of the wrong kind
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl A2AError {
    /// Classify a `serde_json` decode failure
    ///
    /// Syntax and EOF errors are malformed bytes and everything else is a
    /// shape error. Unknown part discriminators never reach this point; see
    /// [`PartContainer`](super::part::PartContainer).
    pub fn from_decode(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Syntax | Category::Eof => A2AError::Parse(err),
            Category::Io => A2AError::Transport(err.to_string()),
            Category::Data => A2AError::InvalidParams(err.to_string()),
        }
    }

    /// Catalog code this error maps to, if any
    pub fn code(&self) -> Option<i32> {
        match self {
            A2AError::Rpc(err) => Some(err.code),
            other => other.catalog_entry().map(ErrorCode::code),
        }
    }

    fn catalog_entry(&self) -> Option<ErrorCode> {
        match self {
            A2AError::Parse(_) => Some(ErrorCode::ParseError),
            A2AError::InvalidRequest(_) => Some(ErrorCode::InvalidRequest),
            A2AError::MethodNotFound(_) => Some(ErrorCode::MethodNotFound),
            A2AError::InvalidParams(_)
            | A2AError::UnknownPartType(_)
            | A2AError::Validation(_)
            | A2AError::ArtifactStreamClosed { .. }
            | A2AError::StreamFinished { .. }
            | A2AError::TaskMismatch { .. }
            | A2AError::InvalidTransition { .. } => Some(ErrorCode::InvalidParams),
            A2AError::Serialization(_) => Some(ErrorCode::InternalError),
            A2AError::Rpc(err) => err.kind(),
            A2AError::Transport(_) | A2AError::Timeout | A2AError::UnexpectedResponse(_) => None,
        }
    }

    /// Convert into the JSON-RPC error a server would send back
    ///
    /// Remote errors pass through untouched. Local errors take their catalog
    /// code's default message and carry their own description in `data`.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        if let A2AError::Rpc(err) = self {
            return err.clone();
        }

        let code = self.catalog_entry().unwrap_or(ErrorCode::InternalError);
        JsonRpcError::from_code(code).with_data(Value::String(self.to_string()))
    }

    /// The structured remote error, when this is one
    pub fn as_rpc(&self) -> Option<&JsonRpcError> {
        match self {
            A2AError::Rpc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}
