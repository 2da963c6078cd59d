//! The shipped example message set.
//!
//! Each builder uses a fresh boundary generator so every artifact is
//! reproducible in isolation and starts at `aaaaaaaaaaaa`.

use crate::message::Message;
use crate::samples;
use anyhow::Result;
use mailforge_mime::BoundaryGenerator;
use mailforge_pgp::PgpEngine;

/// Fixed envelope values shared by every corpus message. Wall-clock dates
/// would break byte-for-byte reproducibility, so the `Date` is constant.
const FROM: &str = "Alice <alice@example.org>";
const TO: &str = "Bob <bob@example.org>";
const DATE: &str = "Sat, 28 May 2016 12:00:00 +0000";

fn stamp_envelope(message: &mut Message) {
    let headers = message.headers_mut();
    headers.add("From", FROM);
    headers.add("To", TO);
    headers.add("Date", DATE);
}

/// A plain `multipart/alternative` message with no protection.
///
/// # Errors
///
/// Fails only on structural construction errors.
pub fn unsigned() -> Result<Message> {
    let mut boundaries = BoundaryGenerator::new();
    let mut message = Message::new("unsigned unencrypted message", "unsigned");
    stamp_envelope(&mut message);

    let body = samples::alternative(&mut boundaries, message.extended_description())?;
    message.replace_body(body);
    Ok(message)
}

/// A detached-signature `multipart/signed` message.
///
/// # Errors
///
/// Fails if the external tool reports diagnostics.
pub fn signed(engine: &dyn PgpEngine) -> Result<Message> {
    let mut boundaries = BoundaryGenerator::new();
    let mut message = Message::new("simple signed message", "signed")
        .with_extended_description(
            "The body is a multipart/alternative wrapped in a multipart/signed\n\
             envelope with a detached OpenPGP signature.\n",
        );
    stamp_envelope(&mut message);

    let body = samples::alternative(&mut boundaries, message.extended_description())?;
    message.sign(body, engine, &mut boundaries)?;
    Ok(message)
}

/// An encrypted-only `multipart/encrypted` message.
///
/// # Errors
///
/// Fails if the external tool reports diagnostics.
pub fn encrypted(engine: &dyn PgpEngine) -> Result<Message> {
    let mut boundaries = BoundaryGenerator::new();
    let mut message = Message::new("simple encrypted message", "encrypted");
    stamp_envelope(&mut message);

    let body = samples::alternative(&mut boundaries, message.extended_description())?;
    message.encrypt(body, engine, &mut boundaries, false)?;
    Ok(message)
}

/// An encrypted message signed in the same pass.
///
/// # Errors
///
/// Fails if the external tool reports diagnostics.
pub fn encrypted_signed(engine: &dyn PgpEngine) -> Result<Message> {
    let mut boundaries = BoundaryGenerator::new();
    let mut message = Message::new("encrypted and signed message", "encrypted-signed");
    stamp_envelope(&mut message);

    let body = samples::alternative(&mut boundaries, message.extended_description())?;
    message.encrypt(body, engine, &mut boundaries, true)?;
    Ok(message)
}

/// A signed message whose body carries an embedded snapshot of the envelope
/// headers as a `text/rfc822-headers` attachment.
///
/// # Errors
///
/// Fails if the external tool reports diagnostics.
pub fn wrapped_signed(engine: &dyn PgpEngine) -> Result<Message> {
    let mut boundaries = BoundaryGenerator::new();
    let mut message = Message::new("signed message with embedded headers", "wrapped-signed")
        .with_extended_description(
            "The signed body wraps the message content together with a\n\
             text/rfc822-headers copy of the envelope headers, so header\n\
             tampering outside the signature can be detected.\n",
        );
    stamp_envelope(&mut message);

    let body = samples::alternative(&mut boundaries, message.extended_description())?;
    let wrapped = message.wrap_with_headers(body, &mut boundaries)?;
    message.sign(wrapped, engine, &mut boundaries)?;
    Ok(message)
}

/// Builds the full corpus in a stable order.
///
/// # Errors
///
/// Fails on the first message whose construction or transform fails.
pub fn build_corpus(engine: &dyn PgpEngine) -> Result<Vec<Message>> {
    Ok(vec![
        unsigned()?,
        signed(engine)?,
        encrypted(engine)?,
        encrypted_signed(engine)?,
        wrapped_signed(engine)?,
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailforge_mime::{Entity, render_structure};
    use mailforge_pgp::{EncryptRequest, ENCRYPTED_SUBJECT, SignRequest};

    /// Engine returning fixed armored blobs.
    struct FixedEngine;

    impl PgpEngine for FixedEngine {
        fn sign(&self, _body: &[u8], _request: &SignRequest) -> mailforge_pgp::Result<Vec<u8>> {
            Ok(b"-----BEGIN PGP SIGNATURE-----\nFAKESIG\n-----END PGP SIGNATURE-----\n".to_vec())
        }

        fn encrypt(
            &self,
            _body: &[u8],
            _request: &EncryptRequest,
        ) -> mailforge_pgp::Result<Vec<u8>> {
            Ok(b"-----BEGIN PGP MESSAGE-----\nFAKEMSG\n-----END PGP MESSAGE-----\n".to_vec())
        }
    }

    #[test]
    fn test_corpus_names_are_unique() {
        let corpus = build_corpus(&FixedEngine).unwrap();
        assert_eq!(corpus.len(), 5);

        let mut names: Vec<&str> = corpus.iter().map(Message::messagename).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), corpus.len());
    }

    #[test]
    fn test_unsigned_structure() {
        let message = unsigned().unwrap();
        let entity = message.entity();
        assert_eq!(entity.content_type.essence(), "multipart/alternative");
        assert_eq!(entity.children().unwrap().len(), 2);

        // One structure line per node
        assert_eq!(render_structure(entity).lines().count(), 3);
    }

    #[test]
    fn test_signed_structure() {
        let message = signed(&FixedEngine).unwrap();
        let entity = message.entity();
        assert_eq!(entity.content_type.essence(), "multipart/signed");
        assert_eq!(entity.content_type.parameter("micalg"), Some("pgp-sha256"));

        let children = entity.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].content_type.essence(), "multipart/alternative");
        assert_eq!(
            children[1].content_type.essence(),
            "application/pgp-signature"
        );
        assert_eq!(entity.subject(), Some("simple signed message"));
    }

    #[test]
    fn test_encrypted_hides_subject() {
        let message = encrypted(&FixedEngine).unwrap();
        let entity = message.entity();
        assert_eq!(entity.content_type.essence(), "multipart/encrypted");
        assert_eq!(entity.subject(), Some(ENCRYPTED_SUBJECT));

        let children = entity.children().unwrap();
        assert_eq!(
            children[0].content_type.essence(),
            "application/pgp-encrypted"
        );
        assert_eq!(
            children[1].content_type.essence(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_wrapped_signed_structure() {
        let message = wrapped_signed(&FixedEngine).unwrap();
        let children = message.entity().children().unwrap();

        let wrapper = &children[0];
        assert_eq!(wrapper.content_type.essence(), "multipart/mixed");
        let inner = wrapper.children().unwrap();
        assert_eq!(inner[0].content_type.essence(), "text/rfc822-headers");
        assert_eq!(inner[1].content_type.essence(), "multipart/alternative");

        let snapshot = String::from_utf8_lossy(inner[0].payload().unwrap()).into_owned();
        assert!(snapshot.contains("From: Alice <alice@example.org>"));
        assert!(snapshot.contains("Message-ID: wrapped-signed@memoryhole.example"));
    }

    #[test]
    fn test_artifacts_are_reproducible() {
        let first = signed(&FixedEngine).unwrap();
        let second = signed(&FixedEngine).unwrap();
        assert_eq!(
            first.entity().to_wire_string(),
            second.entity().to_wire_string()
        );
        assert_eq!(first.description_text(), second.description_text());
    }

    #[test]
    fn test_no_mime_version_in_any_artifact() {
        for message in build_corpus(&FixedEngine).unwrap() {
            assert!(!message.entity().to_wire_string().contains("MIME-Version"));
        }
    }

    #[test]
    fn test_corpus_round_trips() {
        for message in build_corpus(&FixedEngine).unwrap() {
            let parsed = Entity::parse(&message.entity().to_wire_string()).unwrap();
            assert_eq!(
                parsed.content_type.essence(),
                message.entity().content_type.essence()
            );
            assert_eq!(
                parsed.children().map(<[Entity]>::len),
                message.entity().children().map(<[Entity]>::len)
            );
        }
    }
}
