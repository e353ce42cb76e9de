//! A2A task types and lifecycle management

use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    artifact::Artifact,
    error::A2AResult,
    message::Message,
    part::{check_each, Metadata, PartContainer},
};

/// A task in the A2A protocol
///
/// Tasks represent asynchronous operations performed by agents. The history
/// is append-only and chronological; artifacts are ordered by index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Caller-assigned task identifier
    pub id: String,

    /// Optional session grouping several tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Current status of the task
    pub status: TaskStatus,

    /// Outputs produced so far
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// Messages exchanged, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    /// Optional task metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Task {
    /// Create a new task in the `submitted` state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            session_id: None,
            status: TaskStatus::new(TaskState::Submitted),
            artifacts: Vec::new(),
            history: Vec::new(),
            metadata: None,
        }
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Replace the task status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Add a metadata field
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Append a message to the end of the history
    ///
    /// Never reorders and never deduplicates.
    pub fn add_to_history(&mut self, message: Message) -> &mut Self {
        self.history.push(message);
        self
    }

    /// Append an artifact to the end of the artifact collection
    ///
    /// No index-based merge happens here; streamed fragments go through
    /// [`TaskTracker`](super::stream::TaskTracker).
    pub fn add_artifact(&mut self, artifact: Artifact) -> &mut Self {
        self.artifacts.push(artifact);
        self
    }

    /// Artifact stored at the given stream index
    pub fn artifact(&self, index: i64) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.index == index)
    }

    /// The last `length` history entries, as `historyLength` asks for
    pub fn truncated_history(&self, length: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(length);
        &self.history[start..]
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Check if the task is waiting on the caller
    pub fn requires_input(&self) -> bool {
        self.status.state.requires_input()
    }
}

/// Lifecycle state of a task
///
/// submitted → working ↔ input-required → completed | canceled | failed.
/// `unknown` means the state could not be determined; any unrecognised wire
/// value decodes to it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received and is queued for processing
    Submitted,

    /// Task is currently being processed
    Working,

    /// Task requires additional input from the client
    InputRequired,

    /// Task completed successfully
    Completed,

    /// Task was canceled
    Canceled,

    /// Task failed with an error
    Failed,

    /// State could not be determined
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Wire value of the state
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Canceled => "canceled",
            TaskState::Failed => "failed",
            TaskState::Unknown => "unknown",
        }
    }

    /// Check if this is a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed
        )
    }

    /// Check if this state waits on the client
    pub fn requires_input(self) -> bool {
        matches!(self, TaskState::InputRequired)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a task at its last transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// Optional message, e.g. a prompt for more input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// When the state was entered
    pub timestamp: DateTime<Utc>,
}

impl TaskStatus {
    /// Status entering `state` now
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a status message
    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }

    /// Override the transition timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Streaming delta carrying a new status for a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatusUpdateEvent {
    /// Task the update refers to
    pub id: String,

    /// New status
    pub status: TaskStatus,

    /// The update stream for this task ends with this event
    #[serde(rename = "final", default)]
    pub is_final: bool,

    /// Optional event metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TaskStatusUpdateEvent {
    /// Create a status update
    pub fn new(id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            status,
            is_final: false,
            metadata: None,
        }
    }

    /// Mark this as the last event of the stream
    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }
}

/// Streaming delta carrying one artifact fragment for a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskArtifactUpdateEvent {
    /// Task the update refers to
    pub id: String,

    /// Artifact fragment to merge
    pub artifact: Artifact,

    /// Optional event metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TaskArtifactUpdateEvent {
    /// Create an artifact update
    pub fn new(id: impl Into<String>, artifact: Artifact) -> Self {
        Self {
            id: id.into(),
            artifact,
            metadata: None,
        }
    }
}

impl PartContainer for Task {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        check_each(value.get("artifacts"), Artifact::check_part_types)?;
        check_each(value.get("history"), Message::check_part_types)?;
        value.get("status").map_or(Ok(()), TaskStatus::check_part_types)
    }
}

impl PartContainer for TaskStatus {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        value.get("message").map_or(Ok(()), Message::check_part_types)
    }
}

impl PartContainer for TaskStatusUpdateEvent {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        value.get("status").map_or(Ok(()), TaskStatus::check_part_types)
    }
}

impl PartContainer for TaskArtifactUpdateEvent {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        value.get("artifact").map_or(Ok(()), Artifact::check_part_types)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::protocol::part::Part;

    #[test]
    fn test_task_creation() {
        let task = Task::new("task-123");

        assert_eq!(task.id, "task-123");
        assert_eq!(task.status.state, TaskState::Submitted);
        assert!(!task.is_terminal());
        assert!(task.history.is_empty());
        assert!(task.artifacts.is_empty());
    }

    #[test]
    fn test_task_lifecycle() {
        let task = Task::new("task-123").with_status(TaskStatus::new(TaskState::Working));
        assert_eq!(task.status.state, TaskState::Working);
        assert!(!task.is_terminal());

        let task = task.with_status(
            TaskStatus::new(TaskState::InputRequired).with_message(Message::agent("Which city?")),
        );
        assert!(task.requires_input());

        let task = task.with_status(TaskStatus::new(TaskState::Completed));
        assert!(task.is_terminal());
    }

    #[test]
    fn test_task_states() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::Unknown.is_terminal());

        assert!(TaskState::InputRequired.requires_input());
        assert!(!TaskState::Submitted.requires_input());
    }

    #[test]
    fn test_state_wire_values() {
        let json = serde_json::to_value(TaskState::InputRequired).unwrap();
        assert_eq!(json, "input-required");

        let state: TaskState = serde_json::from_value(json!("canceled")).unwrap();
        assert_eq!(state, TaskState::Canceled);

        let state: TaskState = serde_json::from_value(json!("rejected")).unwrap();
        assert_eq!(state, TaskState::Unknown);
    }

    #[test]
    fn test_history_is_append_only() {
        let mut task = Task::new("task-1");
        let hello = Message::user("hello");

        task.add_to_history(hello.clone())
            .add_to_history(Message::agent("hi"))
            .add_to_history(hello.clone());

        assert_eq!(task.history.len(), 3);
        assert_eq!(task.history[0], hello);
        assert_eq!(task.history[2], hello);
        assert_eq!(task.truncated_history(2).len(), 2);
        assert_eq!(task.truncated_history(2)[0].text(), "hi");
        assert_eq!(task.truncated_history(10).len(), 3);
    }

    #[test]
    fn test_add_artifact_does_not_merge() {
        let mut task = Task::new("task-1");
        task.add_artifact(Artifact::new(vec![Part::text("A")]))
            .add_artifact(Artifact::new(vec![Part::text("B")]));

        assert_eq!(task.artifacts.len(), 2);
        assert_eq!(task.artifacts[1].parts[0].as_text(), Some("B"));
    }

    #[test]
    fn test_task_serialization() {
        let task = Task::new("task-123").with_session_id("session-1");
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], "task-123");
        assert_eq!(json["sessionId"], "session-1");
        assert_eq!(json["status"]["state"], "submitted");
        assert!(json["status"]["timestamp"].is_string());
        assert!(json.get("artifacts").is_none());
        assert!(json.get("history").is_none());

        let decoded: Task = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, task);
    }

    #[test]
    fn test_status_event_final_flag() {
        let event = TaskStatusUpdateEvent::new("task-1", TaskStatus::new(TaskState::Completed))
            .with_final(true);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["final"], true);

        let decoded: TaskStatusUpdateEvent = serde_json::from_value(json!({
            "id": "task-1",
            "status": {"state": "working", "timestamp": "2025-01-01T00:00:00Z"}
        }))
        .unwrap();
        assert!(!decoded.is_final);
    }
}
