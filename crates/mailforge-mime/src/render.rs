//! Structural rendering of MIME entity trees.
//!
//! Produces the one-line-per-entity diagram written into each corpus `.desc`
//! file, for example:
//!
//! ```text
//! └┬╴multipart/signed 950 bytes (Subject: signed message)
//!  ├┬╴multipart/alternative 431 bytes
//!  │├─╴text/plain 77 bytes
//!  │└─╴text/html 198 bytes
//!  └─╴application/pgp-signature 228 bytes
//! ```
//!
//! The walk is read-only. Containers report the serialized byte length of
//! their entire subtree; leaves report the raw payload length.

use crate::entity::Entity;
use std::fmt::Write as _;

/// Renders the structure diagram of `entity` with the default root prefix.
#[must_use]
pub fn render_structure(entity: &Entity) -> String {
    let mut out = String::new();
    render_structure_into(entity, "└", &mut out);
    out
}

/// Renders the structure diagram of `entity` into `out`.
///
/// `prefix` is the guide-line prefix for the entity's own line. Before
/// descending, a trailing corner connector becomes a space (the branch is
/// closed) and a trailing branch connector becomes a vertical bar (the guide
/// line continues); each child then gets a branch connector appended, except
/// the last, which gets a corner.
pub fn render_structure_into(entity: &Entity, prefix: &str, out: &mut String) {
    let charset = entity
        .charset()
        .map(|cs| format!(" ({cs})"))
        .unwrap_or_default();
    let disposition = entity
        .disposition()
        .map(|d| format!(" {}", d.as_str()))
        .unwrap_or_default();
    let filename = entity
        .filename()
        .map(|name| format!(" [{name}]"))
        .unwrap_or_default();
    let subject = entity
        .subject()
        .map(|s| format!(" (Subject: {s})"))
        .unwrap_or_default();
    let essence = entity.content_type.essence();

    if let Some(children) = entity.children() {
        let _ = writeln!(
            out,
            "{prefix}┬╴{essence}{charset}{disposition}{filename} {} bytes{subject}",
            entity.wire_len()
        );

        let descended = prefix.strip_suffix('└').map_or_else(
            || {
                prefix
                    .strip_suffix('├')
                    .map_or_else(|| prefix.to_string(), |rest| format!("{rest}│"))
            },
            |rest| format!("{rest} "),
        );

        for (index, child) in children.iter().enumerate() {
            let connector = if index + 1 == children.len() {
                '└'
            } else {
                '├'
            };
            render_structure_into(child, &format!("{descended}{connector}"), out);
        }
    } else {
        let payload_len = entity.payload().map_or(0, <[u8]>::len);
        let _ = writeln!(
            out,
            "{prefix}─╴{essence}{charset}{disposition}{filename} {payload_len} bytes{subject}"
        );
    }
}
