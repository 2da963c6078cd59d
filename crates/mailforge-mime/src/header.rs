//! Ordered email header handling.
//!
//! Corpus artifacts must serialize byte-for-byte identically across runs, so
//! headers keep their insertion order on the wire. Lookup is case-insensitive.

use crate::error::Result;
use std::fmt;

/// Ordered collection of email headers.
///
/// Multi-valued headers such as `To` and `Cc` keep every value in the order
/// it was added.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value, preserving any existing values for the name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Sets a header value, replacing all existing values for the name.
    ///
    /// The new value takes the position of the first existing occurrence, so
    /// replacing `Subject` does not reorder the header block.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let mut iter = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (n, _))| n.eq_ignore_ascii_case(name))
            .map(|(i, _)| i);

        if let Some(first) = iter.next() {
            let trailing: Vec<usize> = iter.collect();
            self.entries[first].1 = value;
            for i in trailing.into_iter().rev() {
                self.entries.remove(i);
            }
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets all values for a header, in insertion order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Checks whether at least one value exists for a header.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes all values for a header.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Returns an iterator over all headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of header values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses headers from raw text.
    ///
    /// Continuation lines (leading space or tab) are folded into the previous
    /// header. Parsing stops at the first empty line.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-continuation line has no colon.
    pub fn parse(text: &str) -> Result<Self> {
        let mut headers = Self::new();
        let mut current: Option<(String, String)> = None;

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = current.as_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                headers.add(name, value);
            }

            let (name, value) = line.split_once(':').ok_or_else(|| {
                crate::error::Error::Parse(format!("header line without colon: {line:?}"))
            })?;
            current = Some((name.trim().to_string(), value.trim().to_string()));
        }

        if let Some((name, value)) = current {
            headers.add(name, value);
        }

        Ok(headers)
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
    }

    #[test]
    fn test_headers_set_replaces_in_place() {
        let mut headers = Headers::new();
        headers.add("Subject", "original");
        headers.add("To", "alice@example.org");

        headers.set("Subject", "replaced");
        assert_eq!(headers.get("Subject"), Some("replaced"));

        // Subject keeps its position before To
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Subject", "To"]);
    }

    #[test]
    fn test_headers_set_collapses_duplicates() {
        let mut headers = Headers::new();
        headers.add("To", "alice@example.org");
        headers.add("To", "bob@example.org");
        assert_eq!(headers.get_all("To").len(), 2);

        headers.set("To", "carol@example.org");
        assert_eq!(headers.get_all("To"), vec!["carol@example.org"]);
    }

    #[test]
    fn test_headers_preserve_insertion_order() {
        let mut headers = Headers::new();
        headers.add("Subject", "test");
        headers.add("Message-ID", "x@memoryhole.example");
        headers.add("From", "alice@example.org");

        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Subject", "Message-ID", "From"]);
    }

    #[test]
    fn test_headers_multi_valued_order() {
        let mut headers = Headers::new();
        headers.add("To", "first@example.org");
        headers.add("Cc", "middle@example.org");
        headers.add("To", "second@example.org");

        assert_eq!(
            headers.get_all("To"),
            vec!["first@example.org", "second@example.org"]
        );
    }

    #[test]
    fn test_headers_remove() {
        let mut headers = Headers::new();
        headers.add("Subject", "test");
        headers.remove("subject");
        assert!(!headers.contains("Subject"));
    }

    #[test]
    fn test_headers_parse_with_continuation() {
        let text = "From: sender@example.org\n\
                    Content-Type: text/plain;\n\
                    \tcharset=utf-8\n\
                    \n\
                    body is not parsed\n";

        let headers = Headers::parse(text).unwrap();
        assert_eq!(headers.get("From"), Some("sender@example.org"));
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_headers_parse_rejects_garbage() {
        assert!(Headers::parse("not a header line\n").is_err());
    }

    #[test]
    fn test_headers_display_order() {
        let mut headers = Headers::new();
        headers.add("Subject", "hello");
        headers.add("From", "alice@example.org");
        assert_eq!(
            headers.to_string(),
            "Subject: hello\nFrom: alice@example.org\n"
        );
    }
}
