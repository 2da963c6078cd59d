//! `mailforge` - synthetic email test-corpus generator.
//!
//! Builds a set of multipart example messages, signs or encrypts them
//! through an external OpenPGP tool, and writes each one out as an `.eml`
//! file plus a `.desc` structural description.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod corpus;
mod message;
mod samples;

use mailforge_pgp::GpgTool;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Directory the corpus artifacts are written under. The OpenPGP trust
/// store lives beneath it at `OpenPGP/GNUPGHOME`.
const CORPUS_DIR: &str = "corpus";

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailforge=debug,mailforge_pgp=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Generating message corpus");

    let corpus_dir = Path::new(CORPUS_DIR);
    fs::create_dir_all(corpus_dir)?;

    let engine = GpgTool::default();
    let messages = corpus::build_corpus(&engine)?;
    for message in &messages {
        message.write_corpus(corpus_dir)?;
    }

    info!("Wrote {} corpus messages", messages.len());
    Ok(())
}
