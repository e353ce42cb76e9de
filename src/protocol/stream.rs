//! Streaming task updates and their reassembly into a task

use std::collections::BTreeSet;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::{
    error::{A2AError, A2AResult},
    part::PartContainer,
    task::{Task, TaskArtifactUpdateEvent, TaskState, TaskStatusUpdateEvent},
};

/// One event of a `tasks/sendSubscribe` or `tasks/resubscribe` stream
///
/// The wire carries no discriminator: an event with a `status` field is a
/// status update, one with an `artifact` field is an artifact update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    /// New task status
    Status(TaskStatusUpdateEvent),

    /// Artifact fragment
    Artifact(TaskArtifactUpdateEvent),
}

impl StreamEvent {
    /// Id of the task the event refers to
    pub fn task_id(&self) -> &str {
        match self {
            StreamEvent::Status(event) => &event.id,
            StreamEvent::Artifact(event) => &event.id,
        }
    }

    /// Whether this is the last event of the stream
    pub fn is_final(&self) -> bool {
        matches!(self, StreamEvent::Status(event) if event.is_final)
    }

    /// Decode an event from a raw JSON value
    pub fn from_value(value: Value) -> A2AResult<Self> {
        let has_status = value.get("status").is_some_and(|v| !v.is_null());
        let has_artifact = value.get("artifact").is_some_and(|v| !v.is_null());

        match (has_status, has_artifact) {
            (true, false) => TaskStatusUpdateEvent::decode(value).map(StreamEvent::Status),
            (false, true) => TaskArtifactUpdateEvent::decode(value).map(StreamEvent::Artifact),
            (true, true) => Err(A2AError::InvalidParams(
                "stream event carries both `status` and `artifact`".into(),
            )),
            (false, false) => Err(A2AError::InvalidParams(
                "stream event carries neither `status` nor `artifact`".into(),
            )),
        }
    }
}

impl PartContainer for StreamEvent {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        TaskStatusUpdateEvent::check_part_types(value)?;
        TaskArtifactUpdateEvent::check_part_types(value)
    }

    fn decode(value: Value) -> A2AResult<Self> {
        Self::from_value(value)
    }
}

impl From<TaskStatusUpdateEvent> for StreamEvent {
    fn from(event: TaskStatusUpdateEvent) -> Self {
        StreamEvent::Status(event)
    }
}

impl From<TaskArtifactUpdateEvent> for StreamEvent {
    fn from(event: TaskArtifactUpdateEvent) -> Self {
        StreamEvent::Artifact(event)
    }
}

impl<'de> Deserialize<'de> for StreamEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        StreamEvent::from_value(value).map_err(de::Error::custom)
    }
}

/// Hook deciding whether a task may move from one state to another
#[cfg_attr(test, mockall::automock)]
pub trait TransitionPolicy {
    /// Accept or reject the transition
    fn check(&self, from: TaskState, to: TaskState) -> A2AResult<()>;
}

/// Accepts every transition; the wire protocol itself enforces none
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissivePolicy;

impl TransitionPolicy for PermissivePolicy {
    fn check(&self, _from: TaskState, _to: TaskState) -> A2AResult<()> {
        Ok(())
    }
}

/// Enforces the documented task lifecycle
///
/// Refreshing the current state and any move involving `unknown` are always
/// accepted. Terminal states are never left.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecyclePolicy;

impl LifecyclePolicy {
    /// Whether `from → to` follows the lifecycle
    pub fn allows(from: TaskState, to: TaskState) -> bool {
        use TaskState::*;

        if from == to || from == Unknown || to == Unknown {
            return true;
        }

        match from {
            Submitted => matches!(to, Working | Canceled | Failed),
            Working => matches!(to, InputRequired | Completed | Canceled | Failed),
            InputRequired => matches!(to, Working | Canceled | Failed),
            Completed | Canceled | Failed | Unknown => false,
        }
    }
}

impl TransitionPolicy for LifecyclePolicy {
    fn check(&self, from: TaskState, to: TaskState) -> A2AResult<()> {
        if Self::allows(from, to) {
            Ok(())
        } else {
            Err(A2AError::InvalidTransition { from, to })
        }
    }
}

/// Applies stream events to a task in arrival order
///
/// Artifact fragments are merged by index: a fragment for a new index is
/// inserted, `append=false` replaces the artifact at its index and
/// `append=true` concatenates its parts. `lastChunk=true` closes the index.
/// A status update with `final=true` closes the whole stream.
///
/// Every rejected event leaves the task exactly as it was.
#[derive(Debug, Clone)]
pub struct TaskTracker<P = PermissivePolicy> {
    task: Task,
    closed: BTreeSet<i64>,
    finished: bool,
    policy: P,
}

impl TaskTracker<PermissivePolicy> {
    /// Track a task without lifecycle checks
    pub fn new(task: Task) -> Self {
        Self::with_policy(task, PermissivePolicy)
    }
}

impl<P: TransitionPolicy> TaskTracker<P> {
    /// Track a task, consulting `policy` on every status update
    ///
    /// Artifacts already on the task are put in index order first.
    pub fn with_policy(mut task: Task, policy: P) -> Self {
        task.artifacts.sort_by_key(|a| a.index);
        Self {
            task,
            closed: BTreeSet::new(),
            finished: false,
            policy,
        }
    }

    /// Apply one event
    pub fn apply(&mut self, event: StreamEvent) -> A2AResult<()> {
        match event {
            StreamEvent::Status(event) => self.apply_status_update(event),
            StreamEvent::Artifact(event) => self.apply_artifact_update(event),
        }
    }

    /// Apply a status update
    pub fn apply_status_update(&mut self, event: TaskStatusUpdateEvent) -> A2AResult<()> {
        self.accepts(&event.id)?;

        let from = self.task.status.state;
        let to = event.status.state;
        if let Err(err) = self.policy.check(from, to) {
            warn!(task_id = %self.task.id, %from, %to, "Rejected status transition");
            return Err(err);
        }

        debug!(task_id = %self.task.id, %from, %to, is_final = event.is_final, "Status update");
        self.task.status = event.status;
        if event.is_final {
            self.finished = true;
        }
        Ok(())
    }

    /// Merge an artifact fragment
    pub fn apply_artifact_update(&mut self, event: TaskArtifactUpdateEvent) -> A2AResult<()> {
        self.accepts(&event.id)?;

        let fragment = event.artifact;
        let index = fragment.index;
        if self.closed.contains(&index) {
            warn!(task_id = %self.task.id, index, "Artifact update after last chunk");
            return Err(A2AError::ArtifactStreamClosed { index });
        }

        let last_chunk = fragment.is_last_chunk();
        let artifacts = &mut self.task.artifacts;
        match artifacts.iter().position(|a| a.index == index) {
            Some(pos) if fragment.is_append() => {
                trace!(index, parts = fragment.parts.len(), "Appending artifact parts");
                artifacts[pos].extend_with(fragment);
            }
            Some(pos) => {
                trace!(index, "Replacing artifact");
                artifacts[pos] = fragment;
            }
            None => {
                trace!(index, "Inserting artifact");
                let pos = artifacts.partition_point(|a| a.index < index);
                artifacts.insert(pos, fragment);
            }
        }

        if last_chunk {
            debug!(task_id = %self.task.id, index, "Artifact stream closed");
            self.closed.insert(index);
        }
        Ok(())
    }

    /// Whether the final status update has been applied
    pub fn is_final(&self) -> bool {
        self.finished
    }

    /// Whether the artifact at `index` has received its last chunk
    pub fn is_closed(&self, index: i64) -> bool {
        self.closed.contains(&index)
    }

    /// The task as assembled so far
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Finish tracking and return the task
    pub fn into_task(self) -> Task {
        self.task
    }

    fn accepts(&self, event_task_id: &str) -> A2AResult<()> {
        if self.finished {
            return Err(A2AError::StreamFinished {
                task_id: self.task.id.clone(),
            });
        }
        if event_task_id != self.task.id {
            return Err(A2AError::TaskMismatch {
                expected: self.task.id.clone(),
                actual: event_task_id.to_string(),
            });
        }
        Ok(())
    }
}
