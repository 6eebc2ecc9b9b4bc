//! Synchronous REST client with typed failure kinds.
//!
//! # Overview
//! `RestClient` issues GET/POST/PUT/PATCH/DELETE calls, attaches a fixed set
//! of default headers, encodes request bodies and decodes response bodies
//! into the target the caller asks for:
//!
//! ```no_run
//! use rest_client::{Json, RestClient, Text};
//!
//! # fn main() -> Result<(), rest_client::RestError> {
//! let client = RestClient::new();
//! let page: String = client.get::<Text>("https://example.com/")?;
//! let ids: Vec<u64> = client.get::<Json<Vec<u64>>>("https://example.com/ids")?;
//! client.delete("https://example.com/ids/1")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - The pipeline is `request` (build) -> `response` (execute and classify)
//!   -> `decode` (target shape). `client` composes the three per call.
//! - The transport is the `Executor` trait and the codec the `Serializer`
//!   trait; both are injected at construction. `UreqExecutor` and
//!   `JsonSerializer` are the defaults.
//! - Nothing is kept between calls except the immutable `GlobalHeaders`.
//!   Each call gets a fresh `RequestSession`, so cookies never leak from one
//!   call into another.
//! - Failures are one of four `RestError` kinds: `Connect`, `Response`,
//!   `Serialization`, `Decode`. There are no retries.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod executor;
pub mod headers;
pub mod http;
pub mod request;
pub mod response;
pub mod serializer;
pub mod session;

pub use client::RestClient;
pub use config::ClientConfig;
pub use decode::{Ignore, Json, Target, TargetShape, Text};
pub use error::{BoxError, RestError};
pub use executor::{Executor, ExecutorConfig, UreqExecutor};
pub use headers::GlobalHeaders;
pub use http::{ExecutorResponse, HttpMethod, OutgoingRequest, ResponseBody};
pub use request::RequestBody;
pub use response::ResponseOutcome;
pub use serializer::{JsonSerializer, Serializer};
pub use session::RequestSession;
