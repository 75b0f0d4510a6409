//! # Drift Probes
//!
//! A drift probe collects free-text observations from a subsystem and reduces
//! them to a single score in `[0, 1]`. The score grows with the number of
//! distinct observations, logarithmically, so the first few novel
//! observations move it most and repetition moves it not at all.
//!
//! ## Scoring
//!
//! | Unique observations | Score |
//! |---------------------|-------|
//! | 0 | 0.00 |
//! | 1 | 0.15 |
//! | 9 | 0.50 |
//! | 99 or more | 1.00 |
//!
//! Observations are compared after trimming and lowercasing; blank ones are
//! ignored.
//!
//! Probes are not persisted. [`DriftProbe::emit`] logs one event and returns
//! the score.

use crate::manifest::iso_timestamp;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Unique-observation count at which the score reaches 1.
pub const SATURATION_COUNT: usize = 99;

/// Scores a set of observations.
///
/// Equals `min(1, log10(1 + unique) / 2)` where `unique` counts observations
/// that are distinct ignoring case and surrounding whitespace.
///
/// ```rust
/// use aurora_symbolic::drift::drift_score;
///
/// let none: [&str; 0] = [];
/// assert_eq!(drift_score(&none), 0.0);
/// assert_eq!(drift_score(&["Spike", "spike ", "SPIKE"]), drift_score(&["spike"]));
/// ```
pub fn drift_score<S: AsRef<str>>(observations: &[S]) -> f64 {
    let unique: HashSet<String> = observations
        .iter()
        .map(|o| o.as_ref().trim().to_lowercase())
        .filter(|o| !o.is_empty())
        .collect();

    let scale = ((SATURATION_COUNT + 1) as f64).log10();
    (((1 + unique.len()) as f64).log10() / scale).clamp(0.0, 1.0)
}

/// A single, unpersisted drift observation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftProbe {
    pub source: String,
    pub anchor: String,
    pub srb_tags: Vec<String>,
    pub timestamp: String,
    pub entropy_markers: Vec<String>,
    pub observations: Vec<String>,
}

impl DriftProbe {
    /// Starts an empty probe stamped with the current time.
    pub fn new(source: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            anchor: anchor.into(),
            srb_tags: Vec::new(),
            timestamp: iso_timestamp(Utc::now()),
            entropy_markers: Vec::new(),
            observations: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.srb_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.entropy_markers.push(marker.into());
        self
    }

    /// Records an observation.
    pub fn observe(&mut self, observation: impl Into<String>) -> &mut Self {
        self.observations.push(observation.into());
        self
    }

    pub fn score(&self) -> f64 {
        drift_score(&self.observations)
    }

    /// Logs the probe and returns its score.
    pub fn emit(&self) -> f64 {
        let score = self.score();
        info!(
            source = %self.source,
            anchor = %self.anchor,
            tags = ?self.srb_tags,
            markers = ?self.entropy_markers,
            observations = self.observations.len(),
            score,
            "drift probe"
        );
        score
    }
}
