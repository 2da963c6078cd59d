//! MIME entity tree.
//!
//! An [`Entity`] is one node of a structured message: either raw leaf content
//! or a multipart container of further entities. The body is a sum type so an
//! empty container or a leaf holding children cannot be represented after
//! construction.
//!
//! No entity ever carries a `MIME-Version` header, including the outermost
//! message. The corpus deliberately omits it everywhere so that consumers
//! exercising these messages cannot rely on its presence.

use crate::boundary::BoundaryGenerator;
use crate::content_type::ContentType;
use crate::error::{Error, Result};
use crate::header::Headers;
use std::fmt::Write as _;

/// Header subset captured by [`Entity::header_snapshot`], in render order.
const SNAPSHOT_HEADERS: [&str; 5] = ["Date", "Subject", "From", "To", "Message-ID"];

/// Content disposition values recognized by the structure renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// `Content-Disposition: attachment`.
    Attachment,
    /// `Content-Disposition: inline`.
    Inline,
}

impl Disposition {
    /// Returns the wire token for this disposition.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

/// Entity payload: raw content or child entities.
#[derive(Debug, Clone)]
pub enum Body {
    /// Raw leaf content, stored pre-transfer-encoding.
    Leaf(Vec<u8>),
    /// Ordered, non-empty child entities of a multipart container.
    Multipart(Vec<Entity>),
}

/// One MIME entity: leaf content or a multipart container.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Content type with its parameters (boundary, charset, micalg, ...).
    pub content_type: ContentType,
    /// Entity headers in insertion order.
    pub headers: Headers,
    body: Body,
}

impl Entity {
    /// Constructs a leaf entity.
    #[must_use]
    pub fn leaf(content_type: ContentType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type,
            headers: Headers::new(),
            body: Body::Leaf(payload.into()),
        }
    }

    /// Constructs a multipart container around `children`.
    ///
    /// The boundary is recorded as a content type parameter; callers obtain it
    /// from a [`BoundaryGenerator`] so it cannot collide with any ancestor's
    /// or sibling's.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMultipart`] if `children` is empty.
    pub fn multipart(
        content_type: ContentType,
        children: Vec<Self>,
        boundary: impl Into<String>,
    ) -> Result<Self> {
        if children.is_empty() {
            return Err(Error::EmptyMultipart);
        }
        Ok(Self {
            content_type: content_type.with_parameter("boundary", boundary),
            headers: Headers::new(),
            body: Body::Multipart(children),
        })
    }

    /// Returns the entity body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Checks whether this entity is a multipart container.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self.body, Body::Multipart(_))
    }

    /// Returns the child entities of a container, or `None` for a leaf.
    #[must_use]
    pub fn children(&self) -> Option<&[Self]> {
        match &self.body {
            Body::Multipart(children) => Some(children),
            Body::Leaf(_) => None,
        }
    }

    /// Returns the raw payload of a leaf, or `None` for a container.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Leaf(payload) => Some(payload),
            Body::Multipart(_) => None,
        }
    }

    /// Returns the `Subject` header if present.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("Subject")
    }

    /// Returns the charset parameter of the content type if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.content_type.charset()
    }

    /// Returns the content disposition if it is `attachment` or `inline`.
    ///
    /// Any other disposition value is treated as absent.
    #[must_use]
    pub fn disposition(&self) -> Option<Disposition> {
        let value = self.headers.get("Content-Disposition")?;
        let token = value.split(';').next()?.trim();
        if token.eq_ignore_ascii_case("attachment") {
            Some(Disposition::Attachment)
        } else if token.eq_ignore_ascii_case("inline") {
            Some(Disposition::Inline)
        } else {
            None
        }
    }

    /// Returns the filename, from the `Content-Disposition` `filename`
    /// parameter or the content type `name` parameter.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        if let Some(value) = self.headers.get("Content-Disposition") {
            for param in value.split(';').skip(1) {
                if let Some((key, v)) = param.trim().split_once('=')
                    && key.trim().eq_ignore_ascii_case("filename")
                {
                    return Some(v.trim().trim_matches('"'));
                }
            }
        }
        self.content_type.parameter("name")
    }

    /// Renders the fixed envelope header subset as `Name: value` lines.
    ///
    /// Covers `Date`, `Subject`, `From`, `To`, `Message-ID`, in that order,
    /// each only if present (first value only for multi-valued headers).
    #[must_use]
    pub fn header_snapshot(&self) -> String {
        let mut out = String::new();
        for name in SNAPSHOT_HEADERS {
            if let Some(value) = self.headers.get(name) {
                let _ = writeln!(out, "{name}: {value}");
            }
        }
        out
    }

    /// Wraps `body` in a `multipart/mixed` container together with a
    /// `text/rfc822-headers` snapshot of this entity's envelope headers.
    ///
    /// The snapshot part is marked `Content-Disposition: attachment` and comes
    /// first. The caller decides whether the returned container replaces the
    /// message body or stands alone.
    ///
    /// # Errors
    ///
    /// Construction cannot fail structurally (the container always holds two
    /// parts); the `Result` mirrors [`Entity::multipart`].
    pub fn wrap_with_headers(
        &self,
        body: Self,
        boundaries: &mut BoundaryGenerator,
    ) -> Result<Self> {
        let mut snapshot = Self::leaf(
            ContentType::new("text", "rfc822-headers"),
            self.header_snapshot(),
        );
        snapshot.headers.add("Content-Disposition", "attachment");

        Self::multipart(
            ContentType::new("multipart", "mixed"),
            vec![snapshot, body],
            boundaries.next_boundary(),
        )
    }

    /// Replaces this entity's content type and payload with `other`'s,
    /// keeping this entity's headers.
    ///
    /// Used by the assembly layer to graft a built tree (or a transform
    /// result) into a top-level message without disturbing its envelope
    /// headers.
    pub fn replace_content(&mut self, other: Self) {
        self.content_type = other.content_type;
        self.body = other.body;
    }

    /// Derives the expected passphrase from the `From` address.
    ///
    /// The local part of the address (text before `@`, display name and angle
    /// bracket stripped) is wrapped in underscores:
    /// `Alice <alice@example.org>` becomes `_alice_`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSender`] if there is no `From` header or it
    /// contains no `@`.
    pub fn sender_passphrase(&self) -> Result<String> {
        let from = self
            .headers
            .get("From")
            .ok_or_else(|| Error::MissingSender("no From header".to_string()))?;

        let at = from
            .find('@')
            .ok_or_else(|| Error::MissingSender(format!("no address in From: {from:?}")))?;
        let prefix = &from[..at];
        let local = prefix.rfind('<').map_or(prefix, |i| &prefix[i + 1..]);

        Ok(format!("_{local}_"))
    }

    /// Serializes this entity into `out` as it appears on the wire.
    ///
    /// Headers come first in insertion order, then the `Content-Type` line, a
    /// blank separator line, and the payload. Container children are each
    /// introduced by a `--boundary` line and the container is closed with
    /// `--boundary--`.
    pub fn write_wire(&self, out: &mut String) {
        for (name, value) in self.headers.iter() {
            let _ = writeln!(out, "{name}: {value}");
        }
        let _ = writeln!(out, "Content-Type: {}", self.content_type);
        out.push('\n');

        match &self.body {
            Body::Leaf(payload) => {
                out.push_str(&String::from_utf8_lossy(payload));
            }
            Body::Multipart(children) => {
                // Invariant: multipart construction always records a boundary.
                let boundary = self.content_type.boundary().unwrap_or_default();
                for child in children {
                    let _ = writeln!(out, "--{boundary}");
                    child.write_wire(out);
                    out.push('\n');
                }
                let _ = writeln!(out, "--{boundary}--");
            }
        }
    }

    /// Returns the full wire form of this entity as a string.
    #[must_use]
    pub fn to_wire_string(&self) -> String {
        let mut out = String::new();
        self.write_wire(&mut out);
        out
    }

    /// Returns the exact byte length of the wire form of this entity,
    /// including its own headers and all descendants.
    #[must_use]
    pub fn wire_len(&self) -> usize {
        self.to_wire_string().len()
    }
}

impl Default for Entity {
    /// An empty `text/plain` leaf, used as a placeholder when swapping the
    /// top-level entity of a message.
    fn default() -> Self {
        Self::leaf(ContentType::text_plain(), Vec::new())
    }
}
