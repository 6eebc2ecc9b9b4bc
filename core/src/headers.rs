//! Default headers applied to every request.

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const APPLICATION_JSON: &str = "application/json";

/// Immutable header set owned by the client and shared by all calls.
///
/// Seeded with `Content-Type: application/json` and
/// `Accept: application/json`. Caller entries replace a default whose name
/// matches ignoring ASCII case; other entries are appended in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalHeaders {
    entries: Vec<(String, String)>,
}

impl GlobalHeaders {
    /// JSON `Content-Type` and `Accept` defaults, overlaid with `overrides`.
    ///
    /// Header names are compared ignoring ASCII case, unlike a plain
    /// case-sensitive map: `content-type` replaces the `Content-Type` default
    /// instead of being sent alongside it. The replacing entry keeps the
    /// caller's spelling. Of two overrides differing only in case, the later
    /// one wins.
    pub fn new<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = vec![
            (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
            (ACCEPT.to_string(), APPLICATION_JSON.to_string()),
        ];
        for (name, value) in overrides {
            let (name, value) = (name.into(), value.into());
            match entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
                Some(slot) => *slot = (name, value),
                None => entries.push((name, value)),
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn to_vec(&self) -> Vec<(String, String)> {
        self.entries.clone()
    }
}

impl Default for GlobalHeaders {
    fn default() -> Self {
        Self::new(std::iter::empty::<(String, String)>())
    }
}
