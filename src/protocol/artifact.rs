//! Artifacts: task outputs delivered whole or as indexed chunks

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    error::{A2AResult, ValidationError},
    part::{check_parts, Metadata, Part, PartContainer},
};

/// An output produced by a task
///
/// When streamed, artifacts arrive as fragments keyed by `index`. The
/// `append` and `lastChunk` flags tell the receiver how to reassemble them;
/// see [`TaskTracker`](super::stream::TaskTracker).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// A human readable name for the artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A human readable description of the artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Contents of the artifact
    pub parts: Vec<Part>,

    /// Position of this artifact in the task's artifact collection
    #[serde(default)]
    pub index: i64,

    /// Concatenate onto the existing parts at `index` instead of replacing them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,

    /// No further fragments will follow for `index`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_chunk: Option<bool>,

    /// Optional artifact metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Artifact {
    /// Create an artifact at index 0 with the given parts
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            name: None,
            description: None,
            parts,
            index: 0,
            append: None,
            last_chunk: None,
            metadata: None,
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the index
    pub fn with_index(mut self, index: i64) -> Self {
        self.index = index;
        self
    }

    /// Set the append flag
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = Some(append);
        self
    }

    /// Set the lastChunk flag
    pub fn with_last_chunk(mut self, last_chunk: bool) -> Self {
        self.last_chunk = Some(last_chunk);
        self
    }

    /// Add a metadata field
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Whether this fragment extends the artifact already at its index
    pub fn is_append(&self) -> bool {
        self.append.unwrap_or(false)
    }

    /// Whether this fragment closes the stream for its index
    pub fn is_last_chunk(&self) -> bool {
        self.last_chunk.unwrap_or(false)
    }

    /// Check each part's invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.parts.iter().try_for_each(Part::validate)
    }

    /// Concatenate a fragment onto this artifact
    ///
    /// Parts are appended in order. Descriptive fields are filled in only
    /// where this artifact has none; metadata entries from the fragment
    /// override existing keys.
    pub(crate) fn extend_with(&mut self, fragment: Artifact) {
        self.parts.extend(fragment.parts);

        if self.name.is_none() {
            self.name = fragment.name;
        }
        if self.description.is_none() {
            self.description = fragment.description;
        }
        if let Some(metadata) = fragment.metadata {
            self.metadata
                .get_or_insert_with(HashMap::new)
                .extend(metadata);
        }
        self.append = fragment.append;
        self.last_chunk = fragment.last_chunk;
    }
}

impl PartContainer for Artifact {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        check_parts(value.get("parts"))
    }
}
