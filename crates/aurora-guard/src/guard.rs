//! The export guard.
//!
//! [`ExportGuard`] is the single entry point for artifacts leaving the system.
//! It validates (or repairs) the manifest according to policy, seals the
//! artifact, re-verifies the seal, optionally attaches a glyphcard, and
//! records one audit entry.

use crate::{
    audit::{AuditEntry, AuditSink, TracingAuditSink, AUDIT_TAGS},
    config::{ExportPolicy, GuardConfig},
    error::GuardError,
    Result,
};

use aurora_symbolic::manifest::{DEFAULT_CLASSIFICATION, DEFAULT_CONTEXT_TAG};
use aurora_symbolic::{
    create_seal, default_manifest, make_glyphcard, stable_stringify, verify_seal, Glyphcard,
    GlyphcardOptions, Manifest, SealError, SealedArtifact,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Warning recorded when the caller supplied no manifest.
pub const WARN_MANIFEST_MISSING: &str = "Manifest missing; applied default manifest";

/// Warning recorded when `dlp.classification` was filled in.
pub const WARN_CLASSIFICATION_MISSING: &str = "DLP classification missing; defaulted to DLP_L1_OK";

/// Warning recorded when `dlp.context_tag` was filled in.
pub const WARN_CONTEXT_TAG_MISSING: &str = "DLP context_tag missing; defaulted to AURORA_EXPORT";

/// Source label used when the caller does not give one.
pub const DEFAULT_SOURCE: &str = "unspecified";

/// Per-call options. Every `Some` overrides the guard's [`GuardConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub manifest: Option<Manifest>,
    pub policy: Option<ExportPolicy>,
    pub glyphcard: Option<bool>,
    pub redact: Option<bool>,
    pub source: Option<String>,
    pub title: Option<String>,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn policy(mut self, policy: ExportPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn glyphcard(mut self, enabled: bool) -> Self {
        self.glyphcard = Some(enabled);
        self
    }

    pub fn redact(mut self, redact: bool) -> Self {
        self.redact = Some(redact);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOutcome<T> {
    pub sealed: SealedArtifact<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphcard: Option<Glyphcard>,

    pub warnings: Vec<String>,
}

/// Policy-enforcing façade over sealing and glyphcards.
///
/// # Security Model
///
/// | Policy | Missing manifest | Missing DLP field |
/// |--------|------------------|-------------------|
/// | `off` | default, silent | default, silent |
/// | `warn` | default + warning | default + warning |
/// | `strict` | error | error |
///
/// A seal that fails its own verification right after creation is an error
/// under every policy.
///
/// # Example
///
/// ```rust
/// use aurora_guard::{ExportGuard, ExportOptions, ExportPolicy, GuardConfig};
/// use serde_json::json;
///
/// let guard = ExportGuard::new(GuardConfig::default());
///
/// let outcome = guard.guard_export(json!({"test": "data"}), ExportOptions::new())?;
/// assert!(outcome.warnings[0].contains("Manifest missing"));
///
/// let strict = ExportOptions::new().policy(ExportPolicy::Strict);
/// assert!(guard.guard_export(json!({"test": "data"}), strict).is_err());
/// # Ok::<(), aurora_guard::GuardError>(())
/// ```
#[derive(Clone)]
pub struct ExportGuard {
    config: GuardConfig,
    sink: Arc<dyn AuditSink>,
}

impl fmt::Debug for ExportGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportGuard")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ExportGuard {
    /// Creates a guard that audits through `tracing`.
    pub fn new(config: GuardConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingAuditSink))
    }

    /// Creates a guard that audits through the given sink.
    pub fn with_sink(config: GuardConfig, sink: Arc<dyn AuditSink>) -> Self {
        debug!(policy = %config.policy, glyphcards = config.glyphcards, "export guard initialized");
        Self { config, sink }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Validates, seals and audits an artifact for export.
    ///
    /// # Errors
    ///
    /// - [`GuardError::ManifestRequired`] / [`GuardError::MissingDlpField`]
    ///   under strict policy
    /// - [`GuardError::Seal`] if the artifact has no JSON representation
    /// - [`GuardError::SelfCheckFailed`] if the new seal does not verify
    pub fn guard_export<T: Serialize>(
        &self,
        artifact: T,
        options: ExportOptions,
    ) -> Result<ExportOutcome<T>> {
        let policy = options.policy.unwrap_or(self.config.policy);
        let mut warnings = Vec::new();

        let manifest = self.resolve_manifest(options.manifest, policy, &mut warnings)?;

        let sealed = create_seal(artifact, Some(manifest))?;
        if !verify_seal(&sealed) {
            error!(digest = %sealed.seal.digest, "seal self-check failed");
            return Err(GuardError::SelfCheckFailed {
                digest: sealed.seal.digest.clone(),
            });
        }

        let byte_length = serde_json::to_value(&sealed.artifact)
            .map(|value| stable_stringify(&value).len())
            .map_err(SealError::from)?;

        let glyphcard = if options.glyphcard.unwrap_or(self.config.glyphcards) {
            let card_options = GlyphcardOptions {
                redact: options.redact.unwrap_or(self.config.redact),
                title: options.title,
            };
            Some(make_glyphcard(&sealed, &card_options)?)
        } else {
            None
        };

        self.sink.record(&AuditEntry {
            anchor: sealed.manifest.anchor.clone(),
            tags: AUDIT_TAGS.iter().map(|t| t.to_string()).collect(),
            policy,
            source: options.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            digest: sealed.seal.digest.clone(),
            byte_length,
            warnings: warnings.clone(),
        });

        Ok(ExportOutcome {
            sealed,
            glyphcard,
            warnings,
        })
    }

    /// Applies the policy to the supplied manifest, filling gaps or failing.
    fn resolve_manifest(
        &self,
        manifest: Option<Manifest>,
        policy: ExportPolicy,
        warnings: &mut Vec<String>,
    ) -> Result<Manifest> {
        let mut manifest = match manifest {
            Some(manifest) => manifest,
            None if policy == ExportPolicy::Strict => return Err(GuardError::ManifestRequired),
            None => {
                if policy == ExportPolicy::Warn {
                    warnings.push(WARN_MANIFEST_MISSING.to_string());
                }
                default_manifest()
            }
        };

        if is_blank(&manifest.dlp.classification) {
            if policy == ExportPolicy::Strict {
                return Err(GuardError::MissingDlpField {
                    field: "classification",
                });
            }
            if policy == ExportPolicy::Warn {
                warnings.push(WARN_CLASSIFICATION_MISSING.to_string());
            }
            manifest.dlp.classification = Some(DEFAULT_CLASSIFICATION.to_string());
        }

        if is_blank(&manifest.dlp.context_tag) {
            if policy == ExportPolicy::Strict {
                return Err(GuardError::MissingDlpField {
                    field: "context_tag",
                });
            }
            if policy == ExportPolicy::Warn {
                warnings.push(WARN_CONTEXT_TAG_MISSING.to_string());
            }
            manifest.dlp.context_tag = Some(DEFAULT_CONTEXT_TAG.to_string());
        }

        Ok(manifest)
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |v| v.trim().is_empty())
}
