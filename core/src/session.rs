//! Per-call cookie and session state.
//!
//! # Design
//! A `RequestSession` is created by the response extractor for exactly one
//! call and dropped afterwards. It is deliberately not `Clone`: two calls can
//! never observe the same cookies, even when they share one executor.
//!
//! Within a call the session carries cookies across redirect hops. Cookies
//! are scoped to the exact host that set them; `Domain` and `Path`
//! attributes are not interpreted.

use std::collections::BTreeMap;

use uuid::Uuid;

/// Fresh, empty cookie context for a single call.
#[derive(Debug)]
pub struct RequestSession {
    id: Uuid,
    /// (host, name) -> value
    cookies: BTreeMap<(String, String), String>,
}

impl RequestSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cookies: BTreeMap::new(),
        }
    }

    /// Unique id of this session, distinct for every call.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Number of cookies held, across all hosts.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn cookie(&self, host: &str, name: &str) -> Option<&str> {
        self.cookies
            .get(&(host.to_ascii_lowercase(), name.to_string()))
            .map(String::as_str)
    }

    pub fn insert_cookie(&mut self, host: &str, name: impl Into<String>, value: impl Into<String>) {
        self.cookies
            .insert((host.to_ascii_lowercase(), name.into()), value.into());
    }

    /// Record the `name=value` pair of a `Set-Cookie` header sent by `host`.
    ///
    /// Attributes after the first `;` are ignored. Values without `=` or with
    /// an empty name are skipped.
    pub fn store_set_cookie(&mut self, host: &str, raw: &str) {
        let pair = raw.split(';').next().unwrap_or_default();
        if let Some((name, value)) = pair.split_once('=') {
            let name = name.trim();
            if !name.is_empty() {
                self.insert_cookie(host, name, value.trim());
            }
        }
    }

    /// Value for a `Cookie` header on a request to `host`, or `None` when no
    /// cookie is held for it.
    pub fn cookie_header(&self, host: &str) -> Option<String> {
        let host = host.to_ascii_lowercase();
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|((h, _), _)| *h == host)
            .map(|((_, name), value)| format!("{name}={value}"))
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}

impl Default for RequestSession {
    fn default() -> Self {
        Self::new()
    }
}
