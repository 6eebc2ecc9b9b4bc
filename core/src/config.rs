//! Construction-time configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::executor::ExecutorConfig;

/// Settings for `RestClient::from_config`.
///
/// Deserializable so applications can keep it alongside their own config:
///
/// ```
/// let config: rest_client::ClientConfig =
///     serde_json::from_str(r#"{"headers":{"Authorization":"Bearer t"},"timeout_secs":10}"#)
///         .unwrap();
/// assert_eq!(config.timeout_secs, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Extra or overriding default headers.
    pub headers: BTreeMap<String, String>,
    /// Overall per-call deadline applied by the executor.
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}
