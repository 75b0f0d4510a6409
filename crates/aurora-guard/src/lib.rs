//! # Aurora Export Guard
//!
//! Policy-enforcing entry point for artifacts leaving an Aurora deployment.
//! Wraps the sealing primitives of [`aurora_symbolic`] with manifest
//! validation, a post-seal self-check, optional glyphcards, and an audit
//! trail.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        EXPORT GUARD                              │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  artifact + options                                              │
//! │        │                                                         │
//! │        ▼                                                         │
//! │  ┌─────────────┐  strict + gap   ┌───────────────┐               │
//! │  │   POLICY    │────────────────▶│  GuardError   │               │
//! │  │ off/warn/   │                 └───────────────┘               │
//! │  │ strict      │  warn + gap ──▶ warnings                        │
//! │  └──────┬──────┘                                                 │
//! │         ▼                                                        │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐             │
//! │  │    SEAL     │──▶│ SELF-CHECK  │──▶│  GLYPHCARD  │ (optional)  │
//! │  └─────────────┘   └─────────────┘   └──────┬──────┘             │
//! │                                             ▼                    │
//! │                                      ┌─────────────┐             │
//! │                                      │ AUDIT SINK  │             │
//! │                                      └─────────────┘             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `AURORA_EXPORT_POLICY` | `off`, `warn`, `strict` | `warn` |
//! | `AURORA_GLYPHCARDS` | boolean-ish | off |
//! | `AURORA_GLYPHCARD_REDACT` | boolean-ish | on |
//!
//! Variables are read only by [`GuardConfig::from_env`], which belongs at
//! process entry. Per-call [`ExportOptions`] override the configuration.
//!
//! ## Security Notes
//!
//! - Strict policy fails before anything is sealed or audited.
//! - A seal that does not verify immediately after creation is an error,
//!   never a warning.
//! - Audit entries carry the digest and size of the artifact, never its
//!   content.

mod audit;
mod config;
mod error;
mod guard;

pub use audit::{AuditEntry, AuditSink, MemoryAuditSink, TracingAuditSink, AUDIT_TAGS};
pub use config::{
    ExportPolicy, GuardConfig, ENV_EXPORT_POLICY, ENV_GLYPHCARDS, ENV_GLYPHCARD_REDACT,
};
pub use error::{ConfigError, GuardError};
pub use guard::{
    ExportGuard, ExportOptions, ExportOutcome, DEFAULT_SOURCE, WARN_CLASSIFICATION_MISSING,
    WARN_CONTEXT_TAG_MISSING, WARN_MANIFEST_MISSING,
};

pub use aurora_symbolic::{Glyphcard, Manifest, SealedArtifact};

/// Result type for export guard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
