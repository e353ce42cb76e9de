//! Content parts carried by messages and artifacts
//!
//! The concrete shape of a part is selected by its `type` field, so decoding
//! happens in two passes: peek the discriminator, then decode the same raw
//! value into the shape it names.

use std::{collections::HashMap, fmt};

use base64::{engine::general_purpose, Engine as _};
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::{A2AError, A2AResult, ValidationError};

/// Open-ended caller metadata
pub type Metadata = HashMap<String, Value>;

/// Discriminator of a [`Part`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// `"text"`
    Text,
    /// `"file"`
    File,
    /// `"data"`
    Data,
}

impl PartKind {
    /// Wire value of the discriminator
    pub fn as_str(self) -> &'static str {
        match self {
            PartKind::Text => "text",
            PartKind::File => "file",
            PartKind::Data => "data",
        }
    }

    /// Parse a wire discriminator
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(PartKind::Text),
            "file" => Some(PartKind::File),
            "data" => Some(PartKind::Data),
            _ => None,
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content part: text, file, or structured data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    /// Plain text
    Text(TextPart),

    /// Inline or referenced file
    File(FilePart),

    /// Structured JSON object
    Data(DataPart),
}

/// Text content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    /// The text content
    pub text: String,

    /// Optional part metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// File content wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePart {
    /// The file payload
    pub file: FileContent,

    /// Optional part metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Structured data content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPart {
    /// The structured data
    pub data: Map<String, Value>,

    /// Optional part metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// File payload: inline base64 bytes or a URI, exactly one of the two
///
/// The invariant is checked by [`FileContent::validate`] rather than the type
/// system so that wire payloads violating it can still be decoded and
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    /// Name of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// MIME type of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Base64-encoded file content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,

    /// URI reference to the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

fn is_set(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

impl FileContent {
    /// File content from raw bytes, base64-encoded for the wire
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self::from_base64(general_purpose::STANDARD.encode(bytes))
    }

    /// File content from an already base64-encoded string
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        Self {
            bytes: Some(encoded.into()),
            ..Self::default()
        }
    }

    /// File content referencing a URI
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    /// Set the file name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Check that exactly one of `bytes` and `uri` is set
    ///
    /// Empty strings count as unset.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (is_set(&self.bytes), is_set(&self.uri)) {
            (true, true) => Err(ValidationError::FileBytesAndUri),
            (false, false) => Err(ValidationError::FileMissingContent),
            _ => Ok(()),
        }
    }

    /// Pass/fail form of [`validate`](Self::validate)
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Decode the inline bytes
    ///
    /// Returns `Ok(None)` for a URI reference.
    pub fn decode_bytes(&self) -> A2AResult<Option<Vec<u8>>> {
        match self.bytes.as_deref() {
            Some(encoded) if !encoded.is_empty() => general_purpose::STANDARD
                .decode(encoded)
                .map(Some)
                .map_err(|e| A2AError::InvalidParams(format!("file bytes are not base64: {e}"))),
            _ => Ok(None),
        }
    }
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(TextPart {
            text: text.into(),
            metadata: None,
        })
    }

    /// Create a file part, enforcing the bytes/uri invariant
    pub fn file(file: FileContent) -> A2AResult<Self> {
        file.validate()?;
        Ok(Part::File(FilePart {
            file,
            metadata: None,
        }))
    }

    /// Create a data part
    pub fn data(data: Map<String, Value>) -> Self {
        Part::Data(DataPart {
            data,
            metadata: None,
        })
    }

    /// Create a data part from a JSON value, which must be an object
    pub fn data_value(value: Value) -> A2AResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::data(map)),
            other => Err(A2AError::InvalidParams(format!(
                "data part must be a JSON object, got {other}"
            ))),
        }
    }

    /// Discriminator of this part
    pub fn kind(&self) -> PartKind {
        match self {
            Part::Text(_) => PartKind::Text,
            Part::File(_) => PartKind::File,
            Part::Data(_) => PartKind::Data,
        }
    }

    /// Part metadata, if any
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Part::Text(part) => part.metadata.as_ref(),
            Part::File(part) => part.metadata.as_ref(),
            Part::Data(part) => part.metadata.as_ref(),
        }
    }

    fn metadata_mut(&mut self) -> &mut Option<Metadata> {
        match self {
            Part::Text(part) => &mut part.metadata,
            Part::File(part) => &mut part.metadata,
            Part::Data(part) => &mut part.metadata,
        }
    }

    /// Return this part with one more metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata_mut()
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Text content, for text parts
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(part) => Some(&part.text),
            _ => None,
        }
    }

    /// Check structural invariants of the part
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Part::File(part) => part.file.validate(),
            Part::Text(_) | Part::Data(_) => Ok(()),
        }
    }

    /// Decode a part from a raw JSON value
    pub fn from_value(value: Value) -> A2AResult<Self> {
        decode_part(&value)
    }

    /// Decode a part from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> A2AResult<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(A2AError::Parse)?;
        decode_part(&value)
    }
}

/// First pass: the discriminator alone
#[derive(Deserialize)]
struct PartHeader {
    #[serde(rename = "type")]
    kind: String,
}

fn decode_part(value: &Value) -> A2AResult<Part> {
    let header = PartHeader::deserialize(value).map_err(A2AError::from_decode)?;

    let kind = PartKind::from_tag(&header.kind)
        .ok_or_else(|| A2AError::UnknownPartType(header.kind.clone()))?;

    let part = match kind {
        PartKind::Text => TextPart::deserialize(value).map(Part::Text),
        PartKind::File => FilePart::deserialize(value).map(Part::File),
        PartKind::Data => DataPart::deserialize(value).map(Part::Data),
    };

    part.map_err(|e| A2AError::InvalidParams(format!("malformed {kind} part: {e}")))
}

impl<'de> Deserialize<'de> for Part {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_part(&value).map_err(de::Error::custom)
    }
}

/// Wire types whose JSON form nests content parts
///
/// serde can only report a failure as text, so an unrecognised part buried
/// inside a larger value is located on the raw JSON first. Decoding through
/// [`PartContainer::decode`] yields [`A2AError::UnknownPartType`] with the
/// exact offending tag, and every other shape problem as
/// [`A2AError::InvalidParams`].
pub trait PartContainer: DeserializeOwned {
    /// Fail on the first unrecognised part discriminator inside `value`
    fn check_part_types(value: &Value) -> A2AResult<()>;

    /// Decode from a raw JSON value
    fn decode(value: Value) -> A2AResult<Self> {
        Self::check_part_types(&value)?;
        serde_json::from_value(value).map_err(A2AError::from_decode)
    }
}

/// Check the discriminator of one raw part
///
/// A missing or non-string `type` is left to the shape decoder.
fn check_part(item: &Value) -> A2AResult<()> {
    match item.get("type") {
        Some(Value::String(tag)) if PartKind::from_tag(tag).is_none() => {
            Err(A2AError::UnknownPartType(tag.clone()))
        }
        _ => Ok(()),
    }
}

/// Check a raw `parts` array
pub(crate) fn check_parts(parts: Option<&Value>) -> A2AResult<()> {
    check_each(parts, check_part)
}

/// Check every element of an optional raw array with `check`
pub(crate) fn check_each(
    items: Option<&Value>,
    check: fn(&Value) -> A2AResult<()>,
) -> A2AResult<()> {
    match items {
        Some(Value::Array(items)) => items.iter().try_for_each(check),
        _ => Ok(()),
    }
}

impl PartContainer for Part {
    fn check_part_types(value: &Value) -> A2AResult<()> {
        check_part(value)
    }

    fn decode(value: Value) -> A2AResult<Self> {
        decode_part(&value)
    }
}

impl PartContainer for Value {
    fn check_part_types(_value: &Value) -> A2AResult<()> {
        Ok(())
    }
}
