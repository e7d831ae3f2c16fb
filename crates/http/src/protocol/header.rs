//! Case-insensitive response header bag.
//!
//! Header names are normalized to lower case when they enter the bag, so two writes that only
//! differ by casing always land on the same entry: the last write wins. Insertion order is kept
//! for emission but carries no meaning.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A header name normalized to lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderKey(String);

impl HeaderKey {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for HeaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeaderKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Ordered, case-insensitive header mapping used while a response is being built and inside
/// the emitted envelope.
///
/// # Example
/// ```
/// use micro_reply_http::protocol::ResponseHeaders;
///
/// let mut headers = ResponseHeaders::new();
/// headers.set("Content-Type", "text/html");
/// headers.set("content-type", "text/plain");
/// headers.apply_default("CONTENT-TYPE", "application/json");
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("Content-Type"), Some("text/plain"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(HeaderKey, String)>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self { entries: Vec::with_capacity(4) }
    }

    /// Sets `name` to `value`, overwriting any entry whose name matches case-insensitively.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref();
        let value = value.into();
        match self.position(name) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((HeaderKey::new(name), value)),
        }
    }

    /// Sets `name` only when no entry exists for it yet.
    ///
    /// Returns `true` when the default was applied.
    pub fn apply_default(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> bool {
        let name = name.as_ref();
        if self.has(name) {
            return false;
        }
        self.entries.push((HeaderKey::new(name), value.into()));
        true
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        self.position(name.as_ref()).map(|index| self.entries[index].1.as_str())
    }

    pub fn has(&self, name: impl AsRef<str>) -> bool {
        self.position(name.as_ref()).is_some()
    }

    /// Removes the entry for `name`, returning its value.
    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<String> {
        self.position(name.as_ref()).map(|index| self.entries.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(lowercase-name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.matches(name))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = ResponseHeaders::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

impl Serialize for ResponseHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
