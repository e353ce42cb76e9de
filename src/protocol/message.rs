//! A2A message types

use std::collections::HashMap;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{
    error::{A2AError, A2AResult, ValidationError},
    part::{check_parts, Metadata, Part, PartContainer},
};

/// A message in the A2A protocol
///
/// Messages are the primary unit of communication between agents. Each
/// message has a role and an ordered list of parts; the order is the
/// presentation order and is preserved through encode and decode.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Message content parts
    pub parts: Vec<Part>,

    /// Optional message metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user
    User,

    /// Message from an agent
    Agent,
}

/// Envelope-level fields, with parts left undecoded
#[derive(Deserialize)]
struct RawMessage {
    role: Role,
    parts: Vec<Value>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

impl Message {
    /// Create a message from a role and parts
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            role,
            parts,
            metadata: None,
        }
    }

    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Create an agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, vec![Part::text(text)])
    }

    /// Create a new message builder
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Add a metadata field to the message
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Add a message part
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Concatenated text of all text parts, in order
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// Check that the message has parts and each part is well formed
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.parts.is_empty() {
            return Err(ValidationError::EmptyParts { field: "parts" });
        }
        self.parts.iter().try_for_each(Part::validate)
    }

    /// Decode a message from a raw JSON value
    ///
    /// Envelope fields are decoded first, then each part in order. The first
    /// failing part aborts the decode.
    pub fn from_value(value: Value) -> A2AResult<Self> {
        let raw = RawMessage::deserialize(value).map_err(A2AError::from_decode)?;
        Self::from_raw(raw)
    }

    /// Decode a message from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> A2AResult<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(A2AError::Parse)?;
        Self::from_value(value)
    }

    /// Encode the message to JSON bytes
    pub fn to_vec(&self) -> A2AResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(A2AError::Serialization)
    }

    fn from_raw(raw: RawMessage) -> A2AResult<Self> {
        let parts = raw
            .parts
            .into_iter()
            .map(Part::from_value)
            .collect::<A2AResult<Vec<_>>>()?;

        Ok(Self {
            role: raw.role,
            parts,
            metadata: raw.metadata,
        })
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawMessage::deserialize(deserializer)?;
        Message::from_raw(raw).map_err(de::Error::custom)
    }
}

/// Builder for constructing Message instances
#[derive(Debug, Default)]
pub struct MessageBuilder {
    role: Option<Role>,
    parts: Vec<Part>,
    metadata: Option<Metadata>,
}

impl MessageBuilder {
    /// Create a new message builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role of the message
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set the message parts
    pub fn parts(mut self, parts: Vec<Part>) -> Self {
        self.parts = parts;
        self
    }

    /// Add a single part to the message
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a metadata field
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Build the message
    ///
    /// # Errors
    ///
    /// Fails if the role is not set, there are no parts, or a part violates
    /// its invariants.
    pub fn build(self) -> A2AResult<Message> {
        let role = self
            .role
            .ok_or(ValidationError::EmptyField { field: "role" })?;

        let message = Message {
            role,
            parts: self.parts,
            metadata: self.metadata,
        };
        message.validate()?;
        Ok(message)
    }
}

impl PartContainer for Message {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        check_parts(value.get("parts"))
    }

    fn decode(value: Value) -> A2AResult<Self> {
        Self::from_value(value)
    }
}
