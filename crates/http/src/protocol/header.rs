//! Header map shared by requests and responses.
//!
//! Names are compared byte-for-byte (`User-Agent` and `user-agent` are two different
//! entries), inserting an existing name replaces its value in place, and iteration
//! follows first-insertion order so serialized responses are deterministic.

use std::fmt;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONNECTION: &str = "Connection";
pub const USER_AGENT: &str = "User-Agent";

/// An ordered, case-sensitive, last-write-wins header map.
#[derive(Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Inserts a header, returning the previous value if `name` was already present.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Looks up a header by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Looks up a header ignoring ASCII case.
    ///
    /// Only used for message framing (`Content-Length`); routing always goes through
    /// [`Headers::get`].
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Equality ignores order: names are unique, so same length plus every entry
/// matching is enough.
impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Eq for Headers {}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        headers.extend(iter);
        headers
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_and_keeps_position() {
        let mut headers = Headers::new();
        headers.insert("Host", "a");
        headers.insert("Accept", "*/*");
        assert_eq!(headers.insert("Host", "b"), Some("a".to_string()));

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Host"), Some("b"));
        assert_eq!(headers.iter().next(), Some(("Host", "b")));
    }

    #[test]
    fn names_are_case_sensitive() {
        let headers: Headers = [("user-agent", "curl/8.0")].into_iter().collect();

        assert_eq!(headers.get(USER_AGENT), None);
        assert_eq!(headers.get("user-agent"), Some("curl/8.0"));
        assert_eq!(headers.get_ignore_case(USER_AGENT), Some("curl/8.0"));
    }

    #[test]
    fn equality_ignores_order() {
        let a: Headers = [("A", "1"), ("B", "2")].into_iter().collect();
        let b: Headers = [("B", "2"), ("A", "1")].into_iter().collect();
        let c: Headers = [("B", "2"), ("A", "3")].into_iter().collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn remove_entry() {
        let mut headers: Headers = [("A", "1"), ("B", "2")].into_iter().collect();

        assert_eq!(headers.remove("A"), Some("1".to_string()));
        assert_eq!(headers.remove("A"), None);
        assert!(!headers.contains("A"));
        assert_eq!(headers.len(), 1);
    }
}
