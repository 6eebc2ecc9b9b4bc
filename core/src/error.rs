//! Error types for the REST client.
//!
//! # Design
//! Every facade call fails with exactly one `RestError`. The four variants are
//! part of the public contract so callers can branch on them: retry on
//! `Connect`, surface `Response::status` to users, treat `Decode` as a
//! contract violation by the server. 4xx and 5xx share the `Response` variant;
//! only the numeric status differs.

/// Boxed cause carried by transport, codec and decode failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `RestClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The transport failed before a status line was obtained.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    /// The server answered with a status code >= 400.
    #[error("Server response [{status}]: {body}")]
    Response { status: u16, body: String },

    /// The request body could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(#[source] BoxError),

    /// The response body could not be decoded into the requested target.
    #[error("decoding failed: {0}")]
    Decode(#[source] BoxError),
}

impl RestError {
    /// Status code of a `Response` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body text of a `Response` error, possibly empty.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            RestError::Response { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, RestError::Connect(_))
    }

    pub fn is_response(&self) -> bool {
        matches!(self, RestError::Response { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, RestError::Serialization(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, RestError::Decode(_))
    }
}
