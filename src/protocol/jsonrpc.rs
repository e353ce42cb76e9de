//! JSON-RPC 2.0 envelopes
//!
//! Requests and responses are generic over their payload so the same
//! structures serve the typed builders in [`crate::protocol::rpc`] and the
//! untyped `serde_json::Value` form used while classifying a response.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

use super::{
    error::{A2AError, A2AResult, JsonRpcError},
    part::PartContainer,
};

/// JSON-RPC version literal
pub const JSONRPC_VERSION: &str = "2.0";

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// Correlation identifier, echoed verbatim and never interpreted
///
/// Any JSON number is accepted, including fractions and integers beyond
/// `i64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// String identifier
    String(String),
    /// Numeric identifier
    Number(Number),
}

impl RequestId {
    /// Mint a fresh, time-ordered string identifier
    pub fn generate() -> Self {
        RequestId::String(Uuid::now_v7().to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(id) => f.write_str(id),
            RequestId::Number(id) => write!(f, "{id}"),
        }
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_string())
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(Number::from(id))
    }
}

impl From<Number> for RequestId {
    fn from(id: Number) -> Self {
        RequestId::Number(id)
    }
}

/// How strictly the `jsonrpc` member is checked on decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// A present `jsonrpc` member must equal `"2.0"`
    #[default]
    Strict,
    /// Any `jsonrpc` value is accepted
    Lenient,
}

/// Check the `jsonrpc` member of a raw envelope against a policy
///
/// A missing member passes under both policies; only a present but different
/// value is rejected, and only under [`VersionPolicy::Strict`].
pub fn check_version(envelope: &Value, policy: VersionPolicy) -> A2AResult<()> {
    if policy == VersionPolicy::Lenient {
        return Ok(());
    }

    match envelope.get("jsonrpc") {
        None => Ok(()),
        Some(Value::String(version)) if version == JSONRPC_VERSION => Ok(()),
        Some(other) => Err(A2AError::InvalidRequest(format!(
            "unsupported jsonrpc version {other}, expected \"{JSONRPC_VERSION}\""
        ))),
    }
}

fn parse_envelope(bytes: &[u8], policy: VersionPolicy) -> A2AResult<Value> {
    let value: Value = serde_json::from_slice(bytes).map_err(A2AError::Parse)?;
    if !value.is_object() {
        return Err(A2AError::InvalidRequest(
            "JSON-RPC envelope must be an object".into(),
        ));
    }
    check_version(&value, policy)?;
    Ok(value)
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest<P = Value> {
    /// Protocol version, always `"2.0"` on requests built here
    #[serde(default = "default_version")]
    pub jsonrpc: String,

    /// Correlation id; absent for a notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,

    /// Method name
    pub method: String,

    /// Method parameters
    pub params: P,
}

impl<P> JsonRpcRequest<P> {
    /// Build a request, setting the version literal
    pub fn new(id: Option<RequestId>, method: impl Into<String>, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    /// Whether this request expects no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

impl<P: Serialize> JsonRpcRequest<P> {
    /// Encode the request to JSON bytes
    pub fn to_vec(&self) -> A2AResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(A2AError::Serialization)
    }

    /// Erase the parameter type
    pub fn into_value(self) -> A2AResult<JsonRpcRequest<Value>> {
        let params = serde_json::to_value(self.params).map_err(A2AError::Serialization)?;
        Ok(JsonRpcRequest {
            jsonrpc: self.jsonrpc,
            id: self.id,
            method: self.method,
            params,
        })
    }
}

impl JsonRpcRequest<Value> {
    /// Decode an incoming request
    ///
    /// Fails with [`A2AError::Parse`] when the bytes are not JSON and with
    /// [`A2AError::InvalidRequest`] when the envelope shape or version is wrong.
    pub fn from_slice(bytes: &[u8], policy: VersionPolicy) -> A2AResult<Self> {
        let value = parse_envelope(bytes, policy)?;
        let request: JsonRpcRequest<Option<Value>> = serde_json::from_value(value)
            .map_err(|e| A2AError::InvalidRequest(e.to_string()))?;
        Ok(JsonRpcRequest {
            jsonrpc: request.jsonrpc,
            id: request.id,
            method: request.method,
            params: request.params.unwrap_or(Value::Null),
        })
    }

    /// Decode the parameters into the method's typed structure
    pub fn decode_params<P: PartContainer>(&self) -> A2AResult<P> {
        P::check_part_types(&self.params)?;
        P::deserialize(&self.params).map_err(A2AError::from_decode)
    }
}

/// JSON-RPC 2.0 response envelope
///
/// `result` and `error` are exclusive when built through [`success`] and
/// [`failure`]; decoded responses may carry both and are classified by
/// [`into_result`], where a non-null `error` always wins.
///
/// [`success`]: JsonRpcResponse::success
/// [`failure`]: JsonRpcResponse::failure
/// [`into_result`]: JsonRpcResponse::into_result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse<R = Value> {
    /// Protocol version
    #[serde(default = "default_version")]
    pub jsonrpc: String,

    /// Id echoed from the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,

    /// Method result on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<R>,

    /// Error object on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

impl<R> JsonRpcResponse<R> {
    /// Build a success response
    pub fn success(id: Option<RequestId>, result: R) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response
    pub fn failure(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Whether the response is an error, decided only by a non-null `error`
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Borrow the result, if any
    pub fn result(&self) -> Option<&R> {
        self.result.as_ref()
    }

    /// Borrow the error, if any
    pub fn error(&self) -> Option<&JsonRpcError> {
        self.error.as_ref()
    }

    /// Classify the response
    ///
    /// An error wins over a result. A response with neither is a success
    /// whose result is null (`Ok(None)`).
    pub fn into_result(self) -> Result<Option<R>, JsonRpcError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result),
        }
    }
}

impl<R: Serialize> JsonRpcResponse<R> {
    /// Encode the response to JSON bytes
    pub fn to_vec(&self) -> A2AResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(A2AError::Serialization)
    }
}

impl JsonRpcResponse<Value> {
    /// Decode a response envelope without interpreting `result`
    pub fn from_slice(bytes: &[u8], policy: VersionPolicy) -> A2AResult<Self> {
        let value = parse_envelope(bytes, policy)?;
        serde_json::from_value(value).map_err(|e| A2AError::InvalidRequest(e.to_string()))
    }

    /// Re-decode the result into the method's declared type
    ///
    /// Remote errors surface as [`A2AError::Rpc`] with code, message and data
    /// intact. A null result is handed to `T` as JSON `null`.
    pub fn decode_result<T: PartContainer>(self) -> A2AResult<T> {
        let result = self.into_result()?.unwrap_or(Value::Null);
        T::decode(result)
    }
}
