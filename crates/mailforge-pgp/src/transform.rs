//! PGP/MIME envelope transforms (RFC 3156).
//!
//! Both transforms consume the top-level message entity and return a new
//! envelope entity carrying the same headers. The body entity passed in
//! becomes a child of the result, so references into it stay meaningful;
//! callers replace their top-level reference with the returned value. A
//! message must not be reused after a failed transform.

use crate::engine::{EncryptRequest, PgpEngine, SignRequest};
use crate::error::Result;
use mailforge_mime::{BoundaryGenerator, ContentType, Entity};
use tracing::debug;

/// Placeholder overwriting the `Subject` of encrypted messages, so the
/// original subject does not leak.
pub const ENCRYPTED_SUBJECT: &str = "Memory Hole Encrypted Message";

/// Header names whose values become encryption recipients, in scan order.
const RECIPIENT_HEADERS: [&str; 3] = ["To", "Cc", "From"];

/// Signs `body` and wraps it in a `multipart/signed` envelope.
///
/// The signer identity is `sender`, or the message's `From` header when
/// absent; the passphrase is derived from the `From` address. The envelope
/// keeps the message's headers and holds `[body, signature]`, with
/// `micalg=pgp-sha256` and `protocol=application/pgp-signature`.
///
/// # Errors
///
/// Returns an error if the message has no usable `From` address or the
/// engine fails.
pub fn sign(
    message: Entity,
    body: Entity,
    engine: &dyn PgpEngine,
    boundaries: &mut BoundaryGenerator,
    sender: Option<&str>,
) -> Result<Entity> {
    let passphrase = message.sender_passphrase()?;
    let signer = sender
        .or_else(|| message.headers.get("From"))
        .unwrap_or_default()
        .to_string();

    debug!(%signer, "signing message body");
    let canonical = canonicalize_crlf(message_bytes(&body));
    let signature_bytes = engine.sign(&canonical, &SignRequest { signer, passphrase })?;

    let signature = Entity::leaf(
        ContentType::new("application", "pgp-signature"),
        signature_bytes,
    );

    let mut envelope = Entity::multipart(
        ContentType::new("multipart", "signed")
            .with_parameter("micalg", "pgp-sha256")
            .with_parameter("protocol", "application/pgp-signature"),
        vec![body, signature],
        boundaries.next_boundary(),
    )?;
    envelope.headers = message.headers;
    Ok(envelope)
}

/// Encrypts `body` to every address in the message's `To`, `Cc` and `From`
/// headers and wraps the ciphertext in a `multipart/encrypted` envelope.
///
/// With `also_sign`, the same invocation signs as the `From` identity using
/// the derived passphrase. The envelope keeps the message's headers, holds
/// the fixed `Version: 1` control part followed by the ciphertext, and its
/// `Subject` is overwritten with [`ENCRYPTED_SUBJECT`] regardless of the
/// prior value.
///
/// # Errors
///
/// Returns an error if `also_sign` is requested without a usable `From`
/// address, or the engine fails.
pub fn encrypt(
    message: Entity,
    body: Entity,
    engine: &dyn PgpEngine,
    boundaries: &mut BoundaryGenerator,
    also_sign: bool,
) -> Result<Entity> {
    let mut recipients = Vec::new();
    for name in RECIPIENT_HEADERS {
        recipients.extend(message.headers.get_all(name).iter().map(ToString::to_string));
    }

    let sign_as = if also_sign {
        Some(SignRequest {
            signer: message.headers.get("From").unwrap_or_default().to_string(),
            passphrase: message.sender_passphrase()?,
        })
    } else {
        None
    };

    debug!(recipients = recipients.len(), also_sign, "encrypting message body");
    let canonical = canonicalize_crlf(message_bytes(&body));
    let ciphertext = engine.encrypt(
        &canonical,
        &EncryptRequest {
            recipients,
            sign_as,
        },
    )?;

    let version = Entity::leaf(
        ContentType::new("application", "pgp-encrypted"),
        "Version: 1",
    );
    let data = Entity::leaf(ContentType::new("application", "octet-stream"), ciphertext);

    let mut envelope = Entity::multipart(
        ContentType::new("multipart", "encrypted")
            .with_parameter("protocol", "application/pgp-encrypted"),
        vec![version, data],
        boundaries.next_boundary(),
    )?;
    envelope.headers = message.headers;
    envelope.headers.set("Subject", ENCRYPTED_SUBJECT);
    Ok(envelope)
}

fn message_bytes(entity: &Entity) -> Vec<u8> {
    entity.to_wire_string().into_bytes()
}

/// Normalizes line endings to CRLF: lone LF becomes CRLF, existing CRLF is
/// left untouched.
fn canonicalize_crlf(input: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for byte in input {
        if byte == b'\n' && out.last() != Some(&b'\r') {
            out.push(b'\r');
        }
        out.push(byte);
    }
    out
}
