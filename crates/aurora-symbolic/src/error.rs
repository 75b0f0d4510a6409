//! Error types for sealing and glyphcard generation.

use thiserror::Error;

/// Result type alias for symbolic operations.
pub type Result<T> = std::result::Result<T, SealError>;

/// Errors raised while sealing or summarizing an artifact.
///
/// Verification never returns one of these; [`verify_seal`](crate::verify_seal)
/// fails closed with `false` instead.
#[derive(Debug, Error)]
pub enum SealError {
    /// The artifact or manifest has no JSON representation
    /// (for example a map keyed by non-strings).
    #[error("artifact is not JSON-serializable: {0}")]
    Serialize(#[from] serde_json::Error),
}
