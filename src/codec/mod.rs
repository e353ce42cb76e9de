//! Serialization codecs for the JSON-RPC binding

pub mod jsonrpc;
pub mod sse;

pub use jsonrpc::JsonRpcCodec;
pub use sse::SseCodec;

use bytes::Bytes;

use crate::{
    protocol::{error::A2AError, operation::A2AOperation},
    service::response::A2AResponse,
};

/// Codec trait for encoding and decoding A2A protocol messages
pub trait Codec: Send + Sync {
    /// Serialize an A2A operation to bytes for transport
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError>;

    /// Deserialize transport response bytes to an A2A response
    ///
    /// The request operation selects the result type the body is decoded
    /// into.
    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError>;

    /// MIME type of encoded requests
    fn content_type(&self) -> &str;
}
