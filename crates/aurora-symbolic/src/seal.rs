//! # Artifact Sealing and Verification
//!
//! A seal is the SHA-256 of the canonical form of
//! `{"artifact": <artifact>, "manifest": <manifest without seal>}`.
//! Sealing attaches that digest to the manifest; verification re-derives it
//! and compares.
//!
//! ## Failure Semantics
//!
//! | Operation | On failure |
//! |-----------|------------|
//! | [`create_seal`] | `Err(SealError)`, only for non-JSON artifacts |
//! | [`verify_seal`] | `false`, never an error or a panic |
//! | [`verify_document`] | `false`, never an error or a panic |
//!
//! Verification treats its input as untrusted, so every anomaly (missing
//! back-reference, foreign algorithm, outer and inner seal disagreeing,
//! digest mismatch) collapses to `false`.
//!
//! [`verify_seal`] hashes the typed manifest. A document read from disk or
//! the network should go through [`verify_document`], which hashes the
//! manifest exactly as received, so fields a typed decode would drop or
//! normalize still count.

use crate::canonicalize::digest_hex;
use crate::error::Result;
use crate::manifest::{default_manifest, iso_timestamp};
use crate::models::{Manifest, SealInfo, SealedArtifact, SEAL_ALGO};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Seals `artifact` with `manifest`, stamping the current time.
///
/// A `None` manifest is replaced by [`default_manifest`]. Any seal already
/// present on the manifest is discarded and replaced.
///
/// ```rust
/// use aurora_symbolic::{create_seal, verify_seal};
/// use serde_json::json;
///
/// let sealed = create_seal(json!({"a": 1}), None)?;
/// assert!(verify_seal(&sealed));
/// assert_eq!(sealed.manifest.seal.as_ref(), Some(&sealed.seal));
/// # Ok::<(), aurora_symbolic::SealError>(())
/// ```
pub fn create_seal<T: Serialize>(
    artifact: T,
    manifest: Option<Manifest>,
) -> Result<SealedArtifact<T>> {
    create_seal_at(artifact, manifest, Utc::now())
}

/// Seals `artifact` with a caller-supplied creation time.
///
/// Deterministic: the same artifact, manifest and instant always yield the
/// same sealed artifact.
pub fn create_seal_at<T: Serialize>(
    artifact: T,
    manifest: Option<Manifest>,
    created_at: DateTime<Utc>,
) -> Result<SealedArtifact<T>> {
    let unsealed = manifest.unwrap_or_else(default_manifest).without_seal();
    let digest = compute_digest(&artifact, &unsealed)?;

    let seal = SealInfo {
        algo: SEAL_ALGO.to_string(),
        digest,
        created_at: iso_timestamp(created_at),
    };

    debug!(anchor = %unsealed.anchor, digest = %seal.digest, "artifact sealed");

    Ok(SealedArtifact {
        artifact,
        manifest: Manifest {
            seal: Some(seal.clone()),
            ..unsealed
        },
        seal,
    })
}

/// Re-derives the digest of a sealed artifact and compares it to the seal.
///
/// Returns `false` when:
/// - `manifest.seal` is absent
/// - the algorithm is not SHA-256
/// - the outer `seal` differs from `manifest.seal`
/// - the artifact cannot be serialized
/// - the recomputed digest differs from the stored one
pub fn verify_seal<T: Serialize>(sealed: &SealedArtifact<T>) -> bool {
    let Some(inner) = sealed.manifest.seal.as_ref() else {
        debug!("verification failed: manifest carries no seal");
        return false;
    };

    if inner.algo != SEAL_ALGO || *inner != sealed.seal {
        debug!(algo = %inner.algo, "verification failed: seal metadata mismatch");
        return false;
    }

    match compute_digest(&sealed.artifact, &sealed.manifest.without_seal()) {
        Ok(digest) => {
            let valid = digest == inner.digest;
            if !valid {
                debug!(expected = %inner.digest, actual = %digest, "verification failed: digest mismatch");
            }
            valid
        }
        Err(e) => {
            debug!(error = %e, "verification failed: artifact not serializable");
            false
        }
    }
}

/// Verifies a sealed document in its raw JSON form.
///
/// The document must be an object holding exactly `artifact`, `manifest`
/// and `seal`. The digest is recomputed over the received `manifest` minus
/// its `seal` key, without decoding it into a [`Manifest`].
///
/// ```rust
/// use aurora_symbolic::{create_seal, verify_document};
/// use serde_json::json;
///
/// let sealed = create_seal(json!({"a": 1}), None)?;
/// let mut document = serde_json::to_value(&sealed)?;
/// assert!(verify_document(&document));
///
/// document["manifest"]["clearance"] = json!("PUBLIC");
/// assert!(!verify_document(&document));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn verify_document(document: &Value) -> bool {
    let Some(fields) = document.as_object() else {
        debug!("verification failed: document is not an object");
        return false;
    };
    if fields.len() != 3 {
        debug!(keys = fields.len(), "verification failed: unexpected top-level keys");
        return false;
    }

    let (Some(artifact), Some(manifest), Some(outer)) = (
        fields.get("artifact"),
        fields.get("manifest").and_then(Value::as_object),
        fields.get("seal"),
    ) else {
        debug!("verification failed: document shape");
        return false;
    };

    let Some(inner) = manifest.get("seal") else {
        debug!("verification failed: manifest carries no seal");
        return false;
    };
    if inner != outer || outer.get("algo").and_then(Value::as_str) != Some(SEAL_ALGO) {
        debug!("verification failed: seal metadata mismatch");
        return false;
    }
    let Some(expected) = outer.get("digest").and_then(Value::as_str) else {
        debug!("verification failed: seal carries no digest");
        return false;
    };

    let mut unsealed = manifest.clone();
    unsealed.remove("seal");

    let mut payload = Map::new();
    payload.insert("artifact".to_string(), artifact.clone());
    payload.insert("manifest".to_string(), Value::Object(unsealed));

    let digest = digest_hex(&Value::Object(payload));
    let valid = digest == expected;
    if !valid {
        debug!(expected = %expected, actual = %digest, "verification failed: digest mismatch");
    }
    valid
}

/// Canonical digest of an artifact together with an unsealed manifest.
pub(crate) fn compute_digest<T: Serialize>(artifact: &T, manifest: &Manifest) -> Result<String> {
    Ok(digest_hex(&seal_payload(artifact, manifest)?))
}

fn seal_payload<T: Serialize>(artifact: &T, manifest: &Manifest) -> Result<Value> {
    let artifact = serde_json::to_value(artifact)?;
    let manifest = serde_json::to_value(manifest)?;
    Ok(json!({ "artifact": artifact, "manifest": manifest }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonicalize::stable_stringify;
    use crate::manifest::{default_manifest_with, ManifestOverrides};
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn fixed_manifest() -> Manifest {
        default_manifest_with(ManifestOverrides::default().export_time(fixed_time()))
    }

    #[test]
    fn test_seal_round_trip() {
        let sealed = create_seal(json!({"test": "data"}), Some(fixed_manifest())).unwrap();
        assert!(verify_seal(&sealed));
        assert_eq!(sealed.seal.algo, "SHA256");
        assert_eq!(sealed.seal.digest.len(), 64);
    }

    #[test]
    fn test_seal_is_deterministic_with_fixed_clock() {
        let a = create_seal_at(json!([1, 2]), Some(fixed_manifest()), fixed_time()).unwrap();
        let b = create_seal_at(json!([1, 2]), Some(fixed_manifest()), fixed_time()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seal.created_at, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_digest_covers_artifact_and_unsealed_manifest() {
        let manifest = fixed_manifest();
        let sealed = create_seal(json!({"b": 2, "a": 1}), Some(manifest.clone())).unwrap();

        let payload = json!({
            "artifact": {"a": 1, "b": 2},
            "manifest": serde_json::to_value(&manifest).unwrap(),
        });
        assert_eq!(sealed.seal.digest, digest_hex(&payload));
        assert!(stable_stringify(&payload).starts_with(r#"{"artifact":{"a":1,"b":2},"manifest":{"#));
    }

    #[test]
    fn test_existing_seal_is_replaced() {
        let first = create_seal(json!(1), Some(fixed_manifest())).unwrap();
        let resealed = create_seal(json!(2), Some(first.manifest.clone())).unwrap();
        assert!(verify_seal(&resealed));
        assert_ne!(first.seal.digest, resealed.seal.digest);
    }

    #[test]
    fn test_missing_manifest_uses_default() {
        let sealed = create_seal(json!("x"), None).unwrap();
        assert_eq!(sealed.manifest.team, "AuroraOS");
        assert!(verify_seal(&sealed));
    }

    #[test]
    fn test_typed_artifact_round_trip() {
        #[derive(Serialize)]
        struct Report {
            coherence: f64,
            labels: Vec<&'static str>,
        }

        let sealed = create_seal(
            Report {
                coherence: 0.5,
                labels: vec!["x"],
            },
            None,
        )
        .unwrap();
        assert!(verify_seal(&sealed));
    }

    #[test]
    fn test_tamper_artifact_detected() {
        let mut sealed = create_seal(json!({"nested": {"v": 1}}), None).unwrap();
        sealed.artifact["nested"]["v"] = json!(2);
        assert!(!verify_seal(&sealed));
    }

    #[test]
    fn test_tamper_manifest_detected() {
        let mut sealed = create_seal(json!({"v": 1}), None).unwrap();
        sealed.manifest.srb_tags.push("INJECTED".to_string());
        assert!(!verify_seal(&sealed));
    }

    #[test]
    fn test_missing_back_reference_fails_closed() {
        let mut sealed = create_seal(json!({"v": 1}), None).unwrap();
        sealed.manifest.seal = None;
        assert!(!verify_seal(&sealed));
    }

    #[test]
    fn test_outer_seal_mismatch_fails_closed() {
        let mut sealed = create_seal(json!({"v": 1}), None).unwrap();
        sealed.seal.digest = "0".repeat(64);
        assert!(!verify_seal(&sealed));
    }

    #[test]
    fn test_foreign_algorithm_fails_closed() {
        let mut sealed = create_seal(json!({"v": 1}), None).unwrap();
        sealed.seal.algo = "CRC32".to_string();
        sealed.manifest.seal = Some(sealed.seal.clone());
        assert!(!verify_seal(&sealed));
    }

    #[test]
    fn test_unserializable_artifact_is_an_error() {
        let mut map: HashMap<Vec<u8>, u8> = HashMap::new();
        map.insert(vec![1], 1);
        assert!(create_seal(map, None).is_err());
    }
}
