//! Configuration types for the export guard.
//!
//! The guard never reads the environment itself. Process entry points build a
//! [`GuardConfig`] once, typically with [`GuardConfig::from_env`], and hand it
//! to [`ExportGuard::new`](crate::ExportGuard::new).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the export policy.
pub const ENV_EXPORT_POLICY: &str = "AURORA_EXPORT_POLICY";

/// Environment variable enabling glyphcard generation.
pub const ENV_GLYPHCARDS: &str = "AURORA_GLYPHCARDS";

/// Environment variable controlling glyphcard redaction.
pub const ENV_GLYPHCARD_REDACT: &str = "AURORA_GLYPHCARD_REDACT";

/// How strictly manifests are validated before export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportPolicy {
    /// No validation; gaps are filled silently.
    Off,
    /// Gaps are filled and reported as warnings.
    #[default]
    Warn,
    /// Gaps are errors; nothing is sealed.
    Strict,
}

impl ExportPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportPolicy::Off => "off",
            ExportPolicy::Warn => "warn",
            ExportPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for ExportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(ExportPolicy::Off),
            "warn" => Ok(ExportPolicy::Warn),
            "strict" => Ok(ExportPolicy::Strict),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

/// Export guard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Policy applied when a call does not choose one.
    pub policy: ExportPolicy,

    /// Produce a glyphcard for every export unless the call says otherwise.
    pub glyphcards: bool,

    /// Redact generated glyphcards unless the call says otherwise.
    pub redact: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            policy: ExportPolicy::Warn,
            glyphcards: false,
            redact: true,
        }
    }
}

impl GuardConfig {
    /// Reads `AURORA_EXPORT_POLICY`, `AURORA_GLYPHCARDS` and
    /// `AURORA_GLYPHCARD_REDACT` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults. Boolean variables accept
    /// `1/true/yes/on` and `0/false/no/off`; anything else keeps the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let policy = match lookup(ENV_EXPORT_POLICY) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.policy,
        };

        Ok(Self {
            policy,
            glyphcards: lookup(ENV_GLYPHCARDS)
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(defaults.glyphcards),
            redact: lookup(ENV_GLYPHCARD_REDACT)
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(defaults.redact),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
