//! # mailforge-pgp
//!
//! OpenPGP sign/encrypt envelope transforms for corpus messages, delegating
//! the actual cryptography to an external tool (RFC 3156 PGP/MIME shapes).
//!
//! The tool boundary is the [`PgpEngine`] trait; [`GpgTool`] spawns `gpg`
//! against a dedicated trust-store directory, and tests substitute mock
//! engines. Transforms consume the top-level message entity and return a new
//! `multipart/signed` or `multipart/encrypted` envelope carrying the same
//! headers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailforge_mime::{BoundaryGenerator, ContentType, Entity};
//! use mailforge_pgp::{GpgTool, sign};
//!
//! let mut boundaries = BoundaryGenerator::new();
//! let body = Entity::leaf(ContentType::text_plain(), "hello\n");
//! let signed = sign(message, body, &GpgTool::default(), &mut boundaries, None)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod transform;

pub use engine::{EncryptRequest, GpgTool, PgpEngine, SignRequest};
pub use error::{Error, Result};
pub use transform::{ENCRYPTED_SUBJECT, encrypt, sign};
