//! Error types for the export guard.

use aurora_symbolic::SealError;
use thiserror::Error;

/// Errors raised by [`ExportGuard::guard_export`](crate::ExportGuard::guard_export).
///
/// Nothing is sealed or audited when one of these is returned.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Strict policy and no manifest was supplied.
    #[error("strict policy requires a manifest")]
    ManifestRequired,

    /// Strict policy and a required DLP field is missing.
    #[error("strict policy requires dlp.{field}")]
    MissingDlpField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The freshly created seal did not verify. Indicates a bug, not bad input.
    #[error("seal self-check failed for digest {digest}")]
    SelfCheckFailed {
        /// Digest that failed to verify.
        digest: String,
    },

    /// Sealing failed.
    #[error(transparent)]
    Seal(#[from] SealError),
}

/// Errors raised while building a [`GuardConfig`](crate::GuardConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Policy string is not one of `off`, `warn`, `strict`.
    #[error("invalid export policy '{0}' (expected off, warn or strict)")]
    InvalidPolicy(String),
}
