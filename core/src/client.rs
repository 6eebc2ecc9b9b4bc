//! Client facade: one call per HTTP verb.
//!
//! # Design
//! Every operation is the same pipeline, `request::build` ->
//! `response::execute` -> `decode::decode`, parameterized by verb, body and
//! target shape. `send` is the canonical form; the per-verb methods only fix
//! some of its arguments. A call either returns its value or fails with a
//! single `RestError`; nothing partial is observable.
//!
//! `RestClient` holds no per-call state. Its headers are fixed at
//! construction and each call gets its own `RequestSession`, so one client
//! can be shared across threads as long as its executor can.

use serde::Serialize;
use tracing::trace;

use crate::config::ClientConfig;
use crate::decode::{self, Ignore, Target};
use crate::error::RestError;
use crate::executor::{Executor, UreqExecutor};
use crate::headers::GlobalHeaders;
use crate::http::HttpMethod;
use crate::request::{self, RequestBody};
use crate::response;
use crate::serializer::{JsonSerializer, Serializer};

/// Synchronous REST client over an injectable executor and serializer.
#[derive(Debug, Clone)]
pub struct RestClient<E = UreqExecutor, S = JsonSerializer> {
    headers: GlobalHeaders,
    executor: E,
    serializer: S,
}

impl RestClient {
    /// Client with the default JSON headers, ureq transport and JSON codec.
    pub fn new() -> Self {
        Self::with_parts(UreqExecutor::default(), JsonSerializer, GlobalHeaders::default())
    }

    /// Client whose default headers are extended or overridden by `headers`.
    pub fn with_headers<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_parts(UreqExecutor::default(), JsonSerializer, GlobalHeaders::new(headers))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_parts(
            UreqExecutor::new(config.executor_config()),
            JsonSerializer,
            GlobalHeaders::new(config.headers.clone()),
        )
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executor> RestClient<E, JsonSerializer> {
    pub fn with_executor(executor: E, headers: GlobalHeaders) -> Self {
        Self::with_parts(executor, JsonSerializer, headers)
    }
}

impl<E: Executor, S: Serializer> RestClient<E, S> {
    pub fn with_parts(executor: E, serializer: S, headers: GlobalHeaders) -> Self {
        Self {
            headers,
            executor,
            serializer,
        }
    }

    pub fn headers(&self) -> &GlobalHeaders {
        &self.headers
    }

    /// Run one request and decode its body as `T`.
    pub fn send<T: Target>(
        &self,
        method: HttpMethod,
        url: &str,
        body: RequestBody,
    ) -> Result<T::Output, RestError> {
        trace!(target_shape = ?T::shape(), "{method}: {url}");
        let request = request::build(method, url, &self.headers, body);
        let outcome = response::execute(&self.executor, &request)?;
        decode::decode::<T, S>(outcome.body, &self.serializer)
    }

    pub fn get<T: Target>(&self, url: &str) -> Result<T::Output, RestError> {
        self.send::<T>(HttpMethod::Get, url, RequestBody::Empty)
    }

    pub fn delete(&self, url: &str) -> Result<(), RestError> {
        self.send::<Ignore>(HttpMethod::Delete, url, RequestBody::Empty)
    }

    pub fn post<T: Target>(
        &self,
        url: &str,
        body: impl Into<RequestBody>,
    ) -> Result<T::Output, RestError> {
        self.send::<T>(HttpMethod::Post, url, body.into())
    }

    pub fn put<T: Target>(
        &self,
        url: &str,
        body: impl Into<RequestBody>,
    ) -> Result<T::Output, RestError> {
        self.send::<T>(HttpMethod::Put, url, body.into())
    }

    pub fn patch<T: Target>(
        &self,
        url: &str,
        body: impl Into<RequestBody>,
    ) -> Result<T::Output, RestError> {
        self.send::<T>(HttpMethod::Patch, url, body.into())
    }

    /// POST `value` encoded by the client's serializer.
    ///
    /// Encoding failures surface as `RestError::Serialization` before any
    /// network I/O.
    pub fn post_json<T: Target>(
        &self,
        url: &str,
        value: &(impl Serialize + ?Sized),
    ) -> Result<T::Output, RestError> {
        let body = RequestBody::structured(&self.serializer, value)?;
        self.send::<T>(HttpMethod::Post, url, body)
    }

    pub fn put_json<T: Target>(
        &self,
        url: &str,
        value: &(impl Serialize + ?Sized),
    ) -> Result<T::Output, RestError> {
        let body = RequestBody::structured(&self.serializer, value)?;
        self.send::<T>(HttpMethod::Put, url, body)
    }

    pub fn patch_json<T: Target>(
        &self,
        url: &str,
        value: &(impl Serialize + ?Sized),
    ) -> Result<T::Output, RestError> {
        let body = RequestBody::structured(&self.serializer, value)?;
        self.send::<T>(HttpMethod::Patch, url, body)
    }
}
