//! MIME content type handling.
//!
//! Parameters keep their insertion order so that serialized output is stable
//! across runs.

use crate::error::{Error, Result};
use std::fmt;

/// MIME content type with ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "application", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "pgp-signature", "signed").
    pub sub_type: String,
    /// Parameters (e.g., boundary, charset, micalg, protocol) in set order.
    parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type with no parameters.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Creates a text/html content type.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html")
    }

    /// Adds or replaces a parameter, builder style.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_parameter(key, value);
        self
    }

    /// Adds or replaces a parameter in place.
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self
            .parameters
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            entry.1 = value;
        } else {
            self.parameters.push((key, value));
        }
    }

    /// Returns a parameter value if present.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// Returns the `type/subtype` form without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value 2"`
    ///
    /// # Errors
    ///
    /// Returns an error if the `type/subtype` part is missing or malformed.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts
            .next()
            .ok_or_else(|| Error::Parse("empty content type".to_string()))?
            .trim();

        let (main_type, sub_type) = type_str
            .split_once('/')
            .ok_or_else(|| Error::Parse(format!("content type without subtype: {type_str:?}")))?;
        if main_type.trim().is_empty() || sub_type.trim().is_empty() {
            return Err(Error::Parse(format!("malformed content type: {type_str:?}")));
        }

        let mut content_type = Self::new(
            main_type.trim().to_lowercase(),
            sub_type.trim().to_lowercase(),
        );

        for param in parts {
            if let Some((key, value)) = param.trim().split_once('=') {
                content_type.set_parameter(
                    key.trim().to_lowercase(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }

        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;

        for (key, value) in &self.parameters {
            // Quote value if it contains tspecials or whitespace
            if value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c)) {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_new() {
        let ct = ContentType::new("text", "plain");
        assert_eq!(ct.essence(), "text/plain");
        assert!(ct.parameter("charset").is_none());
    }

    #[test]
    fn test_multipart_detection() {
        let ct = ContentType::new("multipart", "signed");
        assert!(ct.is_multipart());
        assert!(!ContentType::text_plain().is_multipart());
    }

    #[test]
    fn test_parameter_order_is_stable() {
        let ct = ContentType::new("multipart", "signed")
            .with_parameter("micalg", "pgp-sha256")
            .with_parameter("protocol", "application/pgp-signature")
            .with_parameter("boundary", "bbbbbbbbbbbb");

        assert_eq!(
            ct.to_string(),
            "multipart/signed; micalg=pgp-sha256; \
             protocol=\"application/pgp-signature\"; boundary=bbbbbbbbbbbb"
        );
    }

    #[test]
    fn test_set_parameter_replaces() {
        let mut ct = ContentType::new("multipart", "mixed");
        ct.set_parameter("boundary", "aaaaaaaaaaaa");
        ct.set_parameter("boundary", "cccccccccccc");
        assert_eq!(ct.boundary(), Some("cccccccccccc"));
        assert_eq!(ct.to_string(), "multipart/mixed; boundary=cccccccccccc");
    }

    #[test]
    fn test_content_type_parse() {
        let ct = ContentType::parse("text/plain; charset=utf-8").unwrap();
        assert_eq!(ct.essence(), "text/plain");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_content_type_parse_quoted() {
        let ct =
            ContentType::parse("multipart/signed; protocol=\"application/pgp-signature\"").unwrap();
        assert_eq!(ct.parameter("protocol"), Some("application/pgp-signature"));
    }

    #[test]
    fn test_content_type_parse_rejects_missing_subtype() {
        assert!(ContentType::parse("text").is_err());
        assert!(ContentType::parse("/plain").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let ct = ContentType::new("multipart", "encrypted")
            .with_parameter("protocol", "application/pgp-encrypted")
            .with_parameter("boundary", "dddddddddddd");
        let parsed = ContentType::parse(&ct.to_string()).unwrap();
        assert_eq!(parsed, ct);
    }
}
