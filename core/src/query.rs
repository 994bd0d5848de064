//! Insertion-ordered query parameters and their querystring encoding.

use std::fmt;

/// A single query parameter value.
///
/// `Flag` entries are encoded as the bare key whatever their value; the
/// remote API treats presence alone as "on".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Flag(bool),
    Text(String),
    Number(i64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Flag(value) => write!(f, "{value}"),
            QueryValue::Text(value) => f.write_str(value),
            QueryValue::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Flag(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Number(value)
    }
}

/// Query parameters kept in insertion order.
///
/// Re-inserting a key replaces the value but keeps the key's original
/// position, so merging defaults into caller options never reorders them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, QueryValue)>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<QueryValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Encode `query` as a querystring, `?` included. Returns an empty string for
/// an empty map. Output depends only on the entries and their order.
pub fn encode(query: &QueryMap) -> String {
    let pairs: Vec<String> = query
        .iter()
        .map(|(key, value)| match value {
            QueryValue::Flag(_) => key.to_string(),
            other => format!("{key}={}", urlencoding::encode(&other.to_string())),
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}
