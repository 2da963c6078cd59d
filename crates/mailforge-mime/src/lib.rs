//! # mailforge-mime
//!
//! MIME entity tree construction, serialization and structure rendering for
//! synthetic test-corpus messages.
//!
//! ## Features
//!
//! - **Entity tree**: sum-typed leaf/container model; empty containers are
//!   rejected at construction
//! - **Deterministic boundaries**: injected generator producing
//!   `aaaaaaaaaaaa`, `bbbbbbbbbbbb`, ... so corpus output is reproducible
//!   byte-for-byte
//! - **Wire serialization**: ordered headers, stable content type parameters
//! - **Structure rendering**: the `┬╴`/`─╴` diagram with guide lines for
//!   arbitrary nesting depth
//! - **Round-trip parsing**: a lenient parser for verifying generated
//!   artifacts
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailforge_mime::{BoundaryGenerator, ContentType, Entity, render_structure};
//!
//! let mut boundaries = BoundaryGenerator::new();
//! let alt = Entity::multipart(
//!     ContentType::new("multipart", "alternative"),
//!     vec![
//!         Entity::leaf(ContentType::text_plain(), "plain text\n"),
//!         Entity::leaf(ContentType::text_html(), "<p>html</p>\n"),
//!     ],
//!     boundaries.next_boundary(),
//! )?;
//!
//! println!("{}", alt.to_wire_string());
//! println!("{}", render_structure(&alt));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod boundary;
mod content_type;
mod entity;
mod error;
mod header;
mod parse;
mod render;

pub use boundary::BoundaryGenerator;
pub use content_type::ContentType;
pub use entity::{Body, Disposition, Entity};
pub use error::{Error, Result};
pub use header::Headers;
pub use render::{render_structure, render_structure_into};
