//! Payload codec seam.
//!
//! Event and snapshot payloads are stored as opaque bytes; the owning
//! aggregate layer supplies the codec that interprets them.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors produced while encoding or decoding payload bytes.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Encode/decode functions for a payload type.
pub trait Codec<T>: Send + Sync {
    /// Encode a payload to bytes for storage.
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decode stored bytes back into a payload.
    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec for any serde-serializable payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
