//! # Core Data Models
//!
//! Wire types shared by the sealer, the verifier, the glyphcard generator and
//! the export guard. Field names serialize exactly as written here, so a
//! sealed artifact on disk reads `{artifact, manifest, seal}` with
//! `manifest.seal` duplicating the outer `seal`.
//!
//! Timestamps are ISO-8601 strings rather than parsed dates. A document sealed
//! by another producer must re-serialize byte-for-byte for its digest to
//! verify, and a parsed date would normalize the offset and precision.
//!
//! The sealed types reject unknown fields. Deserializing would otherwise drop
//! them silently and the typed value could verify while the document did not.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hash algorithm label stored in every seal.
pub const SEAL_ALGO: &str = "SHA256";

/// Provenance and classification metadata attached to an artifact.
///
/// A manifest without `seal` is unsealed and only valid as input to
/// [`create_seal`](crate::seal::create_seal). Inside a [`SealedArtifact`] its
/// `seal` always equals the artifact's own [`SealInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Schema version of the manifest format.
    pub version: String,

    /// Identifier of the subsystem that produced the artifact.
    pub anchor: String,

    /// Policy protocol governing how the artifact may be handled.
    pub ethics_protocol: String,

    /// Free-form classification tags. Order is kept and duplicates are allowed.
    #[serde(default)]
    pub srb_tags: Vec<String>,

    /// Data-loss-prevention metadata.
    #[serde(default)]
    pub dlp: DlpInfo,

    /// Owning team.
    pub team: String,

    /// When the artifact was exported (ISO-8601).
    pub export_time: String,

    /// Back-reference to the seal, set during sealing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal: Option<SealInfo>,
}

impl Manifest {
    /// Returns a copy with `seal` cleared; this is the form the digest covers.
    pub fn without_seal(&self) -> Manifest {
        Manifest {
            seal: None,
            ..self.clone()
        }
    }

    /// Returns true once the manifest has been attached to a seal.
    pub fn is_sealed(&self) -> bool {
        self.seal.is_some()
    }
}

/// Data-loss-prevention metadata.
///
/// `classification` and `context_tag` are required for export, but they can
/// be missing from caller-supplied manifests; the export guard fills or
/// rejects them depending on policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DlpInfo {
    /// Classification label, e.g. `DLP_L1_OK`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,

    /// Context label, e.g. `AURORA_EXPORT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_tag: Option<String>,

    /// Free-text handling notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Digest-based integrity stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealInfo {
    /// Hash algorithm identifier, always [`SEAL_ALGO`].
    pub algo: String,

    /// Lowercase hex digest.
    pub digest: String,

    /// When the seal was created (ISO-8601).
    pub created_at: String,
}

/// An artifact together with its manifest and seal.
///
/// `seal.digest` equals the SHA-256 of
/// `stable_stringify({"artifact": artifact, "manifest": manifest-without-seal})`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealedArtifact<T = Value> {
    /// Opaque payload.
    pub artifact: T,

    /// Manifest with `seal` attached.
    pub manifest: Manifest,

    /// The seal, duplicated in `manifest.seal`.
    pub seal: SealInfo,
}

/// Shape statistics of an artifact. Never carries content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStats {
    /// UTF-8 byte length of the artifact's canonical form.
    pub byte_length: usize,

    /// Coarse type tag: `array`, `object`, `string`, `number`, `boolean` or `null`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Array length, object key count, or 0 for scalars.
    pub keys: usize,
}

/// Redaction-aware, shareable summary of a sealed artifact.
///
/// Field order is fixed so two glyphcards for the same input serialize to
/// identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyphcard {
    /// Display title, `Glyphcard: <anchor>` unless overridden.
    pub title: String,

    /// Seal algorithm.
    pub algo: String,

    /// Seal digest.
    pub digest: String,

    /// Seal creation time.
    pub created_at: String,

    /// Manifest anchor.
    pub anchor: String,

    /// Manifest policy protocol.
    pub ethics_protocol: String,

    /// Manifest classification tags.
    pub srb_tags: Vec<String>,

    /// `dlp.classification` of the manifest.
    pub classification: Option<String>,

    /// `dlp.context_tag` of the manifest.
    pub context_tag: Option<String>,

    /// Manifest schema version.
    pub manifest_version: String,

    /// Owning team.
    pub team: String,

    /// Export time from the manifest.
    pub export_time: String,

    /// Shape of the artifact, never its content.
    pub artifact_stats: ArtifactStats,

    /// Whether the card was produced in redacted mode.
    pub redacted: bool,
}
