//! Request construction.
//!
//! `build` is pure: it merges the client's global headers into a fresh
//! `OutgoingRequest` and attaches the body bytes, nothing else.

use serde::Serialize;

use crate::error::RestError;
use crate::headers::GlobalHeaders;
use crate::http::{HttpMethod, OutgoingRequest};
use crate::serializer::Serializer;

/// Body attached to an outgoing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    Text(String),
}

impl RequestBody {
    /// Encode a structured value through `serializer`.
    pub fn structured<S, T>(serializer: &S, value: &T) -> Result<Self, RestError>
    where
        S: Serializer,
        T: Serialize + ?Sized,
    {
        serializer
            .encode(value)
            .map(RequestBody::Bytes)
            .map_err(RestError::Serialization)
    }

    fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Bytes(bytes) => Some(bytes),
            RequestBody::Text(text) => Some(text.into_bytes()),
        }
    }
}

impl From<()> for RequestBody {
    fn from(_: ()) -> Self {
        RequestBody::Empty
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<&[u8]> for RequestBody {
    fn from(bytes: &[u8]) -> Self {
        RequestBody::Bytes(bytes.to_vec())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

/// Build a request carrying every global header and the given body.
pub fn build(
    method: HttpMethod,
    url: &str,
    headers: &GlobalHeaders,
    body: RequestBody,
) -> OutgoingRequest {
    OutgoingRequest {
        method,
        url: url.to_string(),
        headers: headers.to_vec(),
        body: body.into_bytes(),
    }
}
