//! Corpus message wrapper.
//!
//! A [`Message`] couples a top-level MIME entity with its corpus artifact
//! name and descriptions, and carries the operations the corpus builders
//! need: grafting a body tree, signing, encrypting, header wrapping and
//! writing the `.eml`/`.desc` artifact pair.

use anyhow::Context as _;
use mailforge_mime::{BoundaryGenerator, Entity, Headers, render_structure};
use mailforge_pgp::PgpEngine;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Fixed domain suffix for generated `Message-ID` values.
const MESSAGE_ID_DOMAIN: &str = "memoryhole.example";

/// One corpus message under construction.
#[derive(Debug, Clone)]
pub struct Message {
    entity: Entity,
    messagename: String,
    description: String,
    extended_description: Option<String>,
}

impl Message {
    /// Creates a message named after `messagename` (any path prefix and
    /// extension stripped), stamping `Subject` and a deterministic
    /// `Message-ID` derived from the name.
    #[must_use]
    pub fn new(description: &str, messagename: &str) -> Self {
        let stem = Path::new(messagename)
            .file_stem()
            .map_or_else(|| messagename.to_string(), |s| s.to_string_lossy().into_owned());

        let mut entity = Entity::default();
        entity.headers.add("Subject", description);
        entity
            .headers
            .add("Message-ID", format!("{stem}@{MESSAGE_ID_DOMAIN}"));

        Self {
            entity,
            messagename: stem,
            description: description.to_string(),
            extended_description: None,
        }
    }

    /// Attaches an extended description, builder style. It is printed in the
    /// `.desc` artifact and substitutes the stock text part.
    #[must_use]
    pub fn with_extended_description(mut self, text: &str) -> Self {
        self.extended_description = Some(text.to_string());
        self
    }

    /// Returns the corpus artifact name (no extension).
    #[must_use]
    pub fn messagename(&self) -> &str {
        &self.messagename
    }

    /// Returns the one-line description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the extended description if present.
    #[must_use]
    pub fn extended_description(&self) -> Option<&str> {
        self.extended_description.as_deref()
    }

    /// Returns the top-level entity.
    #[must_use]
    pub const fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Returns the envelope headers for mutation (From, To, Cc, Date, ...).
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.entity.headers
    }

    /// Grafts a built body tree into the message, keeping envelope headers.
    pub fn replace_body(&mut self, body: Entity) {
        self.entity.replace_content(body);
    }

    /// Builds a `multipart/mixed` wrapper holding a snapshot of this
    /// message's envelope headers followed by `body`.
    ///
    /// # Errors
    ///
    /// Mirrors [`Entity::wrap_with_headers`].
    pub fn wrap_with_headers(
        &self,
        body: Entity,
        boundaries: &mut BoundaryGenerator,
    ) -> mailforge_mime::Result<Entity> {
        self.entity.wrap_with_headers(body, boundaries)
    }

    /// Rewrites the message into a `multipart/signed` envelope around `body`.
    ///
    /// # Errors
    ///
    /// Mirrors [`mailforge_pgp::sign`]; the message must not be reused after
    /// a failure.
    pub fn sign(
        &mut self,
        body: Entity,
        engine: &dyn PgpEngine,
        boundaries: &mut BoundaryGenerator,
    ) -> mailforge_pgp::Result<()> {
        let envelope = std::mem::take(&mut self.entity);
        self.entity = mailforge_pgp::sign(envelope, body, engine, boundaries, None)?;
        Ok(())
    }

    /// Rewrites the message into a `multipart/encrypted` envelope around
    /// `body`, optionally signing in the same pass. The `Subject` is
    /// replaced with the fixed placeholder.
    ///
    /// # Errors
    ///
    /// Mirrors [`mailforge_pgp::encrypt`]; the message must not be reused
    /// after a failure.
    pub fn encrypt(
        &mut self,
        body: Entity,
        engine: &dyn PgpEngine,
        boundaries: &mut BoundaryGenerator,
        also_sign: bool,
    ) -> mailforge_pgp::Result<()> {
        let envelope = std::mem::take(&mut self.entity);
        self.entity = mailforge_pgp::encrypt(envelope, body, engine, boundaries, also_sign)?;
        Ok(())
    }

    /// Renders the `.desc` artifact text: description, optional extended
    /// description, then the structure diagram.
    #[must_use]
    pub fn description_text(&self) -> String {
        let mut out = format!("{}\n\n", self.description);
        if let Some(extended) = &self.extended_description {
            out.push_str(extended);
            if !extended.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str(&render_structure(&self.entity));
        out
    }

    /// Writes `<messagename>.eml` and `<messagename>.desc` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub fn write_corpus(&self, dir: &Path) -> anyhow::Result<()> {
        let eml_path = dir.join(format!("{}.eml", self.messagename));
        fs::write(&eml_path, self.entity.to_wire_string())
            .with_context(|| format!("writing {}", eml_path.display()))?;

        let desc_path = dir.join(format!("{}.desc", self.messagename));
        fs::write(&desc_path, self.description_text())
            .with_context(|| format!("writing {}", desc_path.display()))?;

        info!(message = %self.messagename, "wrote corpus artifacts");
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-mail generator ({})", self.description)
    }
}
