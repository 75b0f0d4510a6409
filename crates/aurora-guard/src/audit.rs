//! Audit entries and the sink they are written to.
//!
//! Every successful export produces exactly one [`AuditEntry`]. Where it goes
//! is decided by the [`AuditSink`] handed to the guard; the default,
//! [`TracingAuditSink`], turns it into a structured `tracing` event.

use crate::config::ExportPolicy;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Tags attached to every export audit entry.
pub const AUDIT_TAGS: [&str; 2] = ["EXPORT_GUARD", "SEAL_SHA256"];

/// Structured record of one export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Anchor of the exported artifact's manifest.
    pub anchor: String,

    /// Always [`AUDIT_TAGS`].
    pub tags: Vec<String>,

    /// Policy the export ran under.
    pub policy: ExportPolicy,

    /// Caller-supplied label for the export origin.
    pub source: String,

    /// Seal digest.
    pub digest: String,

    /// Byte length of the artifact's canonical form.
    pub byte_length: usize,

    /// Warnings raised while filling manifest gaps.
    pub warnings: Vec<String>,
}

impl AuditEntry {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Destination for audit entries.
///
/// Implementations must not fail the export; a sink that cannot persist an
/// entry should log and move on.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry);
}

/// Writes audit entries as `tracing` events.
///
/// Entries with warnings are logged at `warn`, the rest at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: &AuditEntry) {
        if entry.has_warnings() {
            warn!(
                anchor = %entry.anchor,
                tags = ?entry.tags,
                policy = %entry.policy,
                source = %entry.source,
                digest = %entry.digest,
                byte_length = entry.byte_length,
                warnings = ?entry.warnings,
                "artifact exported with warnings"
            );
        } else {
            debug!(
                anchor = %entry.anchor,
                tags = ?entry.tags,
                policy = %entry.policy,
                source = %entry.source,
                digest = %entry.digest,
                byte_length = entry.byte_length,
                "artifact exported"
            );
        }
    }
}

/// Keeps audit entries in memory.
///
/// Useful in tests and for callers that batch entries elsewhere.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries recorded so far.
    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: &AuditEntry) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry.clone()),
            Err(poisoned) => poisoned.into_inner().push(entry.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(warnings: Vec<String>) -> AuditEntry {
        AuditEntry {
            anchor: "test".to_string(),
            tags: AUDIT_TAGS.iter().map(|t| t.to_string()).collect(),
            policy: ExportPolicy::Warn,
            source: "unit".to_string(),
            digest: "ab".repeat(32),
            byte_length: 12,
            warnings,
        }
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemoryAuditSink::new();
        sink.record(&entry(vec![]));
        sink.record(&entry(vec!["w".to_string()]));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].has_warnings());
        assert!(entries[1].has_warnings());
    }

    #[test]
    fn test_tracing_sink_accepts_both_severities() {
        let sink = TracingAuditSink;
        sink.record(&entry(vec![]));
        sink.record(&entry(vec!["Manifest missing".to_string()]));
    }

    #[test]
    fn test_entry_serialization() {
        let json = serde_json::to_value(entry(vec![])).unwrap();
        assert_eq!(json["policy"], "warn");
        assert_eq!(json["tags"], serde_json::json!(["EXPORT_GUARD", "SEAL_SHA256"]));
    }
}
