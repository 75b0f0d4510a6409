//! Default manifest construction.

use crate::models::{DlpInfo, Manifest};
use chrono::{DateTime, SecondsFormat, Utc};

/// Manifest schema version written by [`default_manifest`].
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Anchor used when the caller does not name one.
pub const DEFAULT_ANCHOR: &str = "aurora.symbolic";

/// Policy protocol governing every Aurora export.
pub const ETHICS_PROTOCOL: &str = "Picard_Delta_3";

/// `dlp.classification` of the default manifest.
pub const DEFAULT_CLASSIFICATION: &str = "DLP_L1_OK";

/// `dlp.context_tag` of the default manifest.
pub const DEFAULT_CONTEXT_TAG: &str = "AURORA_EXPORT";

/// Team recorded in the default manifest.
pub const DEFAULT_TEAM: &str = "AuroraOS";

/// Optional overrides for [`default_manifest_with`].
///
/// Unset fields take the defaults listed on [`default_manifest`].
#[derive(Debug, Clone, Default)]
pub struct ManifestOverrides {
    pub version: Option<String>,
    pub anchor: Option<String>,
    pub srb_tags: Option<Vec<String>>,
    pub classification: Option<String>,
    pub context_tag: Option<String>,
    pub notes: Option<String>,
    pub team: Option<String>,
    /// Fixed export time, mainly for reproducible digests in tests.
    pub export_time: Option<DateTime<Utc>>,
}

impl ManifestOverrides {
    pub fn anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn srb_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.srb_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn export_time(mut self, at: DateTime<Utc>) -> Self {
        self.export_time = Some(at);
        self
    }
}

/// Builds a fully populated, unsealed manifest.
///
/// Defaults: version `1.0.0`, anchor `aurora.symbolic`, ethics protocol
/// `Picard_Delta_3`, no tags, classification `DLP_L1_OK`, context tag
/// `AURORA_EXPORT`, team `AuroraOS`, export time now.
///
/// ```rust
/// use aurora_symbolic::default_manifest;
///
/// let manifest = default_manifest();
/// assert_eq!(manifest.ethics_protocol, "Picard_Delta_3");
/// assert!(manifest.seal.is_none());
/// ```
pub fn default_manifest() -> Manifest {
    default_manifest_with(ManifestOverrides::default())
}

/// Builds a manifest from defaults with the given overrides applied.
pub fn default_manifest_with(overrides: ManifestOverrides) -> Manifest {
    let export_time = overrides.export_time.unwrap_or_else(Utc::now);

    Manifest {
        version: overrides
            .version
            .unwrap_or_else(|| MANIFEST_VERSION.to_string()),
        anchor: overrides
            .anchor
            .unwrap_or_else(|| DEFAULT_ANCHOR.to_string()),
        ethics_protocol: ETHICS_PROTOCOL.to_string(),
        srb_tags: overrides.srb_tags.unwrap_or_default(),
        dlp: DlpInfo {
            classification: Some(
                overrides
                    .classification
                    .unwrap_or_else(|| DEFAULT_CLASSIFICATION.to_string()),
            ),
            context_tag: Some(
                overrides
                    .context_tag
                    .unwrap_or_else(|| DEFAULT_CONTEXT_TAG.to_string()),
            ),
            notes: overrides.notes,
        },
        team: overrides.team.unwrap_or_else(|| DEFAULT_TEAM.to_string()),
        export_time: iso_timestamp(export_time),
        seal: None,
    }
}

/// Formats a UTC instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
