//! Error types for MIME operations.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A multipart entity was constructed with no children.
    #[error("Multipart entity must have at least one child part")]
    EmptyMultipart,

    /// No usable From address for identity or passphrase derivation.
    #[error("Missing or unusable From address: {0}")]
    MissingSender(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}
