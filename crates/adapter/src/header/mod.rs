//! Ordered, case-insensitive header series.
//!
//! A [`HeaderSeries`] is the wire-level view of one message's headers: a sequence of
//! `(name, value)` pairs that keeps insertion order, compares names ignoring ASCII case
//! and never merges repeated names on its own. Names are stored exactly as they were
//! added or received, so unknown headers can be forwarded untouched.
//!
//! # Example
//!
//! ```
//! use micro_http_adapter::header::HeaderSeries;
//!
//! let mut headers = HeaderSeries::new();
//! headers.add("Accept", "text/html");
//! headers.add("accept", "application/json;q=0.8");
//!
//! assert_eq!(headers.first_value("ACCEPT"), Some("text/html"));
//! assert_eq!(headers.values("Accept").count(), 2);
//! ```

pub mod names;

use std::fmt;

/// A single header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// Returns the name as it was added, with its original case.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Checks if this header has the given name, ignoring ASCII case.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Ordered multimap of header name to value, scoped to one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSeries {
    headers: Vec<Header>,
}

impl HeaderSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { headers: Vec::with_capacity(capacity) }
    }

    /// Appends a header at the end, keeping any existing entry with the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push(Header::new(name, value));
    }

    /// Replaces every entry named `name` with a single one placed where the first entry was,
    /// or appends it when the name is absent.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.headers.iter().position(|h| h.is(name)) {
            Some(index) => {
                self.headers[index].value = value;
                let mut seen = 0usize;
                self.headers.retain(|h| {
                    if h.is(name) {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.add(name, value),
        }
    }

    /// Removes every entry named `name`, returning how many were removed.
    pub fn remove_all(&mut self, name: &str) -> usize {
        let before = self.headers.len();
        self.headers.retain(|h| !h.is(name));
        before - self.headers.len()
    }

    pub fn first(&self, name: &str) -> Option<&Header> {
        self.headers.iter().find(|h| h.is(name))
    }

    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.first(name).map(Header::value)
    }

    /// Iterates over the values of every entry named `name`, in insertion order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers.iter().filter(move |h| h.is(name)).map(Header::value)
    }

    /// Joins the values of every entry named `name` with `", "`.
    ///
    /// Only meaningful for header families whose grammar is a comma separated list, where
    /// repeated lines are one logical list.
    pub fn joined_values(&self, name: &str) -> Option<String> {
        let mut values = self.values(name).peekable();
        values.peek()?;
        Some(values.collect::<Vec<_>>().join(", "))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h.is(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn clear(&mut self) {
        self.headers.clear();
    }
}

impl<'a> IntoIterator for &'a HeaderSeries {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}

impl IntoIterator for HeaderSeries {
    type Item = Header;
    type IntoIter = std::vec::IntoIter<Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.into_iter()
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderSeries
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self { headers: iter.into_iter().map(|(name, value)| Header::new(name, value)).collect() }
    }
}

impl<N, V> Extend<(N, V)> for HeaderSeries
where
    N: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        self.headers.extend(iter.into_iter().map(|(name, value)| Header::new(name, value)));
    }
}

impl fmt::Display for HeaderSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for header in &self.headers {
            write!(f, "{header}\r\n")?;
        }
        Ok(())
    }
}
