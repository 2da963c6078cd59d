//! Error types for OpenPGP transforms.

/// Result type alias for OpenPGP transforms.
pub type Result<T> = std::result::Result<T, Error>;

/// OpenPGP transform error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The external tool reported diagnostics or produced no signature.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The external tool reported diagnostics or produced no ciphertext.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Failure spawning or talking to the external tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural or header error from the MIME layer.
    #[error(transparent)]
    Mime(#[from] mailforge_mime::Error),
}
