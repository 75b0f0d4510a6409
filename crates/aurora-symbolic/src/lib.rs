//! # Aurora Symbolic - Artifact Sealing
//!
//! Integrity tooling for artifacts leaving an Aurora deployment. Every export
//! carries a manifest describing where it came from and how it is classified,
//! and a SHA-256 seal binding the manifest to the payload.
//!
//! ## Components
//!
//! 1. **Canonicalizer** - Key-order independent JSON serialization, so equal
//!    values always hash equally.
//!
//! 2. **Manifest Builder** - Fully populated default manifests with optional
//!    overrides.
//!
//! 3. **Sealer / Verifier** - SHA-256 over the canonical
//!    `{artifact, manifest}` pair; verification re-derives the digest and fails
//!    closed.
//!
//! 4. **Glyphcards** - Redacted summaries (metadata plus shape statistics)
//!    safe to share outside the system.
//!
//! 5. **Drift Probes** - Observation batches reduced to a bounded score.
//!
//! ## Threat Model
//!
//! | Threat | Defense |
//! |--------|---------|
//! | Payload edited after export | Digest mismatch on verify |
//! | Manifest relabelled (e.g. downgraded classification) | Manifest is inside the digest |
//! | Seal copied onto another artifact | Digest covers the artifact |
//! | Fields injected into a received manifest | Unknown fields rejected; `verify_document` hashes the raw manifest |
//! | Key reordering to dodge comparison | Canonical serialization |
//! | Content leak through summaries | Glyphcards carry shape only |
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      AURORA SYMBOLIC                          │
//! ├───────────────────────────────────────────────────────────────┤
//! │                                                               │
//! │  artifact ──┐                                                 │
//! │             ├──▶ CANONICALIZER ──▶ SHA-256 ──▶ SealInfo        │
//! │  manifest ──┘    (sorted keys)                   │            │
//! │  (minus seal)                                    ▼            │
//! │                                        SealedArtifact         │
//! │                                     {artifact, manifest,      │
//! │                                      seal}                    │
//! │                                          │         │          │
//! │                                          ▼         ▼          │
//! │                                      verify    GLYPHCARD      │
//! │                                      (bool)    (shape only)   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use aurora_symbolic::{
//!     create_seal, default_manifest, make_glyphcard, verify_seal, GlyphcardOptions,
//! };
//! use serde_json::json;
//!
//! let mut sealed = create_seal(json!({"coherence": 0.93}), Some(default_manifest()))?;
//! assert!(verify_seal(&sealed));
//!
//! let card = make_glyphcard(&sealed, &GlyphcardOptions::default())?;
//! assert_eq!(card.digest, sealed.seal.digest);
//!
//! // Any edit to the payload breaks the seal
//! sealed.artifact["coherence"] = json!(0.99);
//! assert!(!verify_seal(&sealed));
//! # Ok::<(), aurora_symbolic::SealError>(())
//! ```
//!
//! ## Security Notes
//!
//! - Only SHA-256 is accepted. Seals naming any other algorithm fail
//!   verification.
//! - A seal proves integrity, not authorship: anyone can reseal a modified
//!   artifact. Pair with signatures where provenance matters.
//! - All functions are synchronous and touch no shared state; they are safe
//!   to call from any thread.

pub mod canonicalize;
pub mod drift;
pub mod error;
pub mod glyphcard;
pub mod manifest;
pub mod models;
pub mod seal;

pub use canonicalize::{digest_hex, stable_stringify};
pub use drift::{drift_score, DriftProbe};
pub use error::SealError;
pub use glyphcard::{make_glyphcard, GlyphcardOptions};
pub use manifest::{default_manifest, default_manifest_with, ManifestOverrides};
pub use models::{ArtifactStats, DlpInfo, Glyphcard, Manifest, SealInfo, SealedArtifact};
pub use seal::{create_seal, create_seal_at, verify_document, verify_seal};
