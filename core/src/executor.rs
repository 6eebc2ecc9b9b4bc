//! Executor gateway: the only place that touches the network.
//!
//! # Design
//! The client never talks to a transport directly. It hands an
//! `OutgoingRequest` and a fresh `RequestSession` to an `Executor`, which
//! returns the status code and an optional body reader, or fails before any
//! status line was received. Production code uses `UreqExecutor`; tests
//! substitute a scripted executor.
//!
//! HTTP error statuses are data, not transport failures: classifying them is
//! the response extractor's job.

use std::fmt;
use std::time::Duration;

use tracing::debug;
use ureq::http::{Response, Uri};
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, Body, RequestBuilder};

use crate::error::BoxError;
use crate::http::{ExecutorResponse, HttpMethod, OutgoingRequest, ResponseBody};
use crate::session::RequestSession;

/// Redirect hops followed within one call before giving up.
pub const MAX_REDIRECTS: u32 = 10;

/// Executes a prepared request within a per-call session.
///
/// Implementations must be safe to share between threads; the client adds no
/// locking of its own.
pub trait Executor: Send + Sync {
    /// Perform the network call.
    ///
    /// Returns `Err` only when no status line was obtained (connection
    /// refused, DNS failure, malformed URL or response line). Cookies the
    /// server sets belong in `session`, never in the executor itself.
    fn execute(
        &self,
        request: &OutgoingRequest,
        session: &mut RequestSession,
    ) -> Result<ExecutorResponse, BoxError>;
}

/// Transport settings for `UreqExecutor`.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Overall deadline for one call; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Blocking executor on a pooled `ureq::Agent`.
///
/// The agent follows no redirects itself: `execute` walks 3xx responses hop
/// by hop so that cookies set along the way land in the per-call
/// `RequestSession` and go out with the next hop. That session is the only
/// cookie state a request ever sees.
#[derive(Clone)]
pub struct UreqExecutor {
    agent: Agent,
}

impl fmt::Debug for UreqExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqExecutor").finish_non_exhaustive()
    }
}

impl UreqExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .max_redirects(0)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl Executor for UreqExecutor {
    fn execute(
        &self,
        request: &OutgoingRequest,
        session: &mut RequestSession,
    ) -> Result<ExecutorResponse, BoxError> {
        let mut method = request.method;
        let mut url = request.url.clone();
        let mut body = request.body.clone();
        let mut hops = 0;

        loop {
            let uri: Uri = url.parse()?;
            let host = uri.host().unwrap_or_default().to_string();
            let mut headers = request.headers.clone();
            if let Some(cookie) = session.cookie_header(&host) {
                headers.push(("Cookie".to_string(), cookie));
            }

            let response = self.dispatch(method, &url, &headers, body.as_deref())?;
            let status = response.status().as_u16();
            for raw in response.headers().get_all("set-cookie") {
                if let Ok(value) = raw.to_str() {
                    session.store_set_cookie(&host, value);
                }
            }

            let location = response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok())
                .filter(|_| is_redirect(status))
                .map(str::to_string);
            if let Some(location) = location {
                if hops == MAX_REDIRECTS {
                    return Err(format!("too many redirects (more than {MAX_REDIRECTS})").into());
                }
                hops += 1;
                let next = resolve_location(&uri, &location)?;
                debug!(status, from = %url, to = %next, "following redirect");
                (method, body) = next_hop(status, method, body);
                url = next;
                continue;
            }

            let empty_length = response
                .headers()
                .get("content-length")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.trim() == "0");
            let body: Option<ResponseBody> = if matches!(status, 204 | 304) || empty_length {
                debug!(status, "response carries no entity");
                None
            } else {
                Some(Box::new(response.into_body().into_reader()))
            };
            return Ok(ExecutorResponse::new(status, body));
        }
    }
}

impl UreqExecutor {
    fn dispatch(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[(String, String)],
        body: Option<&[u8]>,
    ) -> Result<Response<Body>, ureq::Error> {
        match method {
            HttpMethod::Get => send_optional(with_headers(self.agent.get(url), headers), body),
            HttpMethod::Delete => send_optional(with_headers(self.agent.delete(url), headers), body),
            HttpMethod::Post => send(with_headers(self.agent.post(url), headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(url), headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(url), headers), body),
        }
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(builder: RequestBuilder<WithBody>, body: Option<&[u8]>) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

/// GET and DELETE carry a body only when the caller supplied one.
fn send_optional(
    builder: RequestBuilder<WithoutBody>,
    body: Option<&[u8]>,
) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.force_send_body().send(bytes),
        None => builder.call(),
    }
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Method and body for the request that follows a redirect.
///
/// 303 always becomes a body-less GET, 301 and 302 turn a POST into one,
/// 307 and 308 replay the request as it was.
fn next_hop(status: u16, method: HttpMethod, body: Option<Vec<u8>>) -> (HttpMethod, Option<Vec<u8>>) {
    match (status, method) {
        (303, _) | (301 | 302, HttpMethod::Post) => (HttpMethod::Get, None),
        _ => (method, body),
    }
}

/// Resolve a `Location` value against the URL that produced it.
fn resolve_location(base: &Uri, location: &str) -> Result<String, BoxError> {
    let scheme = base.scheme_str().unwrap_or("http");
    let authority = base
        .authority()
        .ok_or("redirect from a URL without a host")?
        .as_str();
    let absolute = location
        .parse::<Uri>()
        .is_ok_and(|target| target.scheme().is_some());

    let resolved = if absolute {
        location.to_string()
    } else if let Some(rest) = location.strip_prefix("//") {
        format!("{scheme}://{rest}")
    } else if location.starts_with('/') {
        format!("{scheme}://{authority}{location}")
    } else if location.starts_with('?') {
        format!("{scheme}://{authority}{}{location}", base.path())
    } else {
        let dir = base.path().rsplit_once('/').map_or("", |(dir, _)| dir);
        format!("{scheme}://{authority}{dir}/{location}")
    };
    resolved.parse::<Uri>()?;
    Ok(resolved)
}
