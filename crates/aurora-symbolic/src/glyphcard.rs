//! # Glyphcards
//!
//! A glyphcard is the shareable face of a sealed artifact: seal metadata,
//! manifest classification, and coarse shape statistics. It never contains
//! artifact content, not even an excerpt, whatever the redaction flag says;
//! `redacted` only records what the caller asked for.

use crate::canonicalize::stable_stringify;
use crate::error::Result;
use crate::models::{ArtifactStats, Glyphcard, SealedArtifact};
use serde::Serialize;
use serde_json::Value;

/// Options for [`make_glyphcard`].
#[derive(Debug, Clone)]
pub struct GlyphcardOptions {
    /// Mark the card as redacted. Defaults to `true`.
    pub redact: bool,

    /// Card title. Defaults to `Glyphcard: <anchor>`.
    pub title: Option<String>,
}

impl Default for GlyphcardOptions {
    fn default() -> Self {
        Self {
            redact: true,
            title: None,
        }
    }
}

impl GlyphcardOptions {
    pub fn unredacted() -> Self {
        Self {
            redact: false,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Builds the glyphcard for a sealed artifact.
///
/// Pure: two calls with the same input and options serialize to identical
/// bytes. Fails only when the artifact has no JSON representation.
///
/// ```rust
/// use aurora_symbolic::{create_seal, make_glyphcard, GlyphcardOptions};
/// use serde_json::json;
///
/// let sealed = create_seal(json!({"a": 1, "b": 2, "c": 3}), None)?;
/// let card = make_glyphcard(&sealed, &GlyphcardOptions::default())?;
///
/// assert!(card.redacted);
/// assert_eq!(card.artifact_stats.kind, "object");
/// assert_eq!(card.artifact_stats.keys, 3);
/// # Ok::<(), aurora_symbolic::SealError>(())
/// ```
pub fn make_glyphcard<T: Serialize>(
    sealed: &SealedArtifact<T>,
    options: &GlyphcardOptions,
) -> Result<Glyphcard> {
    let artifact = serde_json::to_value(&sealed.artifact)?;
    let manifest = &sealed.manifest;

    let title = options
        .title
        .clone()
        .unwrap_or_else(|| format!("Glyphcard: {}", manifest.anchor));

    Ok(Glyphcard {
        title,
        algo: sealed.seal.algo.clone(),
        digest: sealed.seal.digest.clone(),
        created_at: sealed.seal.created_at.clone(),
        anchor: manifest.anchor.clone(),
        ethics_protocol: manifest.ethics_protocol.clone(),
        srb_tags: manifest.srb_tags.clone(),
        classification: manifest.dlp.classification.clone(),
        context_tag: manifest.dlp.context_tag.clone(),
        manifest_version: manifest.version.clone(),
        team: manifest.team.clone(),
        export_time: manifest.export_time.clone(),
        artifact_stats: artifact_stats(&artifact),
        redacted: options.redact,
    })
}

/// Shape statistics of a JSON value.
pub fn artifact_stats(value: &Value) -> ArtifactStats {
    let (kind, keys) = match value {
        Value::Array(items) => ("array", items.len()),
        Value::Object(map) => ("object", map.len()),
        Value::String(_) => ("string", 0),
        Value::Number(_) => ("number", 0),
        Value::Bool(_) => ("boolean", 0),
        Value::Null => ("null", 0),
    };

    ArtifactStats {
        byte_length: stable_stringify(value).len(),
        kind: kind.to_string(),
        keys,
    }
}
