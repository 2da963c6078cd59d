//! Parsing wire-form messages back into entity trees.
//!
//! This is the inverse of [`Entity::write_wire`] and exists so generated
//! corpus artifacts can be verified structurally. It is lenient and only
//! handles corpus-shaped input; it is not a general mail parser.

use crate::content_type::ContentType;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::header::Headers;

impl Entity {
    /// Parses a wire-form message into an entity tree.
    ///
    /// The header block is split off at the first blank line; a multipart
    /// body is split on its boundary delimiter lines and each part parsed
    /// recursively. A missing `Content-Type` defaults to `text/plain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the header block is malformed, a multipart
    /// content type carries no boundary parameter, or the body does not
    /// follow the boundary delimiter framing.
    pub fn parse(text: &str) -> Result<Self> {
        let (header_text, body_text) = text
            .split_once("\n\n")
            .ok_or_else(|| Error::Parse("no blank line after header block".to_string()))?;

        let mut headers = Headers::parse(header_text)?;
        let content_type = headers
            .get("Content-Type")
            .map(ContentType::parse)
            .transpose()?
            .unwrap_or_else(ContentType::text_plain);
        headers.remove("Content-Type");

        let mut entity = if content_type.is_multipart() {
            let boundary = content_type
                .boundary()
                .ok_or_else(|| Error::Parse("multipart without boundary".to_string()))?
                .to_string();
            let children = split_parts(body_text, &boundary)?
                .into_iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>>>()?;
            Self::multipart(content_type, children, boundary)?
        } else {
            Self::leaf(content_type, body_text.as_bytes())
        };
        entity.headers = headers;

        Ok(entity)
    }
}

/// Splits a multipart body into its raw part texts.
fn split_parts<'a>(body: &'a str, boundary: &str) -> Result<Vec<&'a str>> {
    let open = format!("--{boundary}\n");
    let separator = format!("\n--{boundary}\n");
    let terminator = format!("\n--{boundary}--");

    let rest = body
        .strip_prefix(&open)
        .ok_or_else(|| Error::Parse(format!("body does not open with --{boundary}")))?;

    let end = rest
        .rfind(&terminator)
        .ok_or_else(|| Error::Parse(format!("body is not closed by --{boundary}--")))?;

    Ok(rest[..end].split(&separator).collect())
}
