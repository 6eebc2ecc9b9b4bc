//! Response classification and body extraction.
//!
//! # Design
//! `execute` runs one request through the executor inside a fresh
//! `RequestSession` and turns the outcome into either a `ResponseOutcome` or
//! exactly one `RestError`:
//! - no status line: `Connect`, wrapping the transport's cause;
//! - status >= 400: the whole body is read as text for diagnostics and
//!   returned in `Response`;
//! - anything below 400 (redirects included): the body reader is handed on
//!   untouched.
//!
//! Reading the diagnostic body may fail; that failure is logged and replaced
//! by an empty string so it never hides the status error.

use std::io::Read;

use tracing::{trace, warn};

use crate::error::RestError;
use crate::executor::Executor;
use crate::http::{OutgoingRequest, ResponseBody};
use crate::session::RequestSession;

/// Successful result of one call.
pub struct ResponseOutcome {
    pub status: u16,
    pub body: Option<ResponseBody>,
}

impl std::fmt::Debug for ResponseOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseOutcome")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

pub fn execute<E: Executor + ?Sized>(
    executor: &E,
    request: &OutgoingRequest,
) -> Result<ResponseOutcome, RestError> {
    let mut session = RequestSession::new();
    let response = executor
        .execute(request, &mut session)
        .map_err(RestError::Connect)?;

    let status = response.status;
    trace!(status, url = %request.url, "response status");
    if status >= 400 {
        let body = diagnostic_text(response.body);
        return Err(RestError::Response { status, body });
    }
    Ok(ResponseOutcome {
        status,
        body: response.body,
    })
}

/// Read an error body for diagnostics; any failure yields an empty string.
fn diagnostic_text(body: Option<ResponseBody>) -> String {
    let Some(mut reader) = body else {
        return String::new();
    };
    let mut bytes = Vec::new();
    if let Err(err) = reader.read_to_end(&mut bytes) {
        warn!(error = %err, "failed to read error response body");
        return String::new();
    }
    String::from_utf8(bytes).unwrap_or_else(|err| {
        warn!(error = %err, "error response body is not valid UTF-8");
        String::new()
    })
}
