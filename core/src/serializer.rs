//! Structured-data codec used for request and response bodies.
//!
//! # Design
//! The client is generic over `Serializer` so callers can plug in their own
//! codec; `JsonSerializer` is the default. Decoding must tolerate fields the
//! target type does not declare. serde does this unless a type opts into
//! `#[serde(deny_unknown_fields)]`, which is the type author's choice.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::BoxError;

/// Encodes values to bytes and decodes bytes into a target type.
pub trait Serializer: Send + Sync {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, BoxError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BoxError>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, BoxError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BoxError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
