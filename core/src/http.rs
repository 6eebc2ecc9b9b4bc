//! HTTP transport types exchanged with the executor.
//!
//! # Design
//! `OutgoingRequest` is plain data: built fresh per call, handed to the
//! `Executor` by reference and dropped when the call returns. The response
//! side keeps the body as a reader rather than a buffered string so the
//! decoder decides how (and whether) to consume it.

use std::fmt;
use std::io::Read;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prepared request described as plain data.
///
/// The URL is not validated; a malformed URL fails inside the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl OutgoingRequest {
    /// First header value whose name matches `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Readable response body handed from the executor to the decoder.
pub type ResponseBody = Box<dyn Read>;

/// What an executor returns once a status line has been received.
pub struct ExecutorResponse {
    pub status: u16,
    /// `None` when the response carries no entity.
    pub body: Option<ResponseBody>,
}

impl ExecutorResponse {
    pub fn new(status: u16, body: Option<ResponseBody>) -> Self {
        Self { status, body }
    }
}

impl fmt::Debug for ExecutorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorResponse")
            .field("status", &self.status)
            .field("body", &self.body.as_ref().map(|_| ".."))
            .finish()
    }
}
