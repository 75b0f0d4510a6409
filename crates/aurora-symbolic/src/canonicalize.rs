//! # Stable JSON Canonicalization
//!
//! Produces a byte-stable string for any JSON value so that two values which
//! are equal up to object key order always serialize, and therefore hash,
//! identically.
//!
//! ## Rules
//!
//! 1. **Object keys**: sorted by UTF-16 code units (the order JavaScript's
//!    default `Array#sort` produces), values canonicalized recursively
//! 2. **Arrays**: elements kept in original order
//! 3. **Strings**: `JSON.stringify` escaping, nothing more
//! 4. **Numbers**: ECMAScript `Number#toString` shape (`1`, `1.5`, `1e+21`)
//! 5. **Whitespace**: none
//!
//! Integers outside the `f64`-exact range (above 2^53) print every digit,
//! where `JSON.stringify` would print a rounded `18446744073709552000`.
//!
//! ## Cycles
//!
//! `serde_json::Value` is an owned tree, so a reference cycle cannot be built
//! in the first place. Every subtree is written out in full, however deep;
//! truncating would let two different artifacts share a digest.
//!
//! ## References
//!
//! - **RFC 8785** - "JSON Canonicalization Scheme (JCS)"
//!   <https://www.rfc-editor.org/rfc/rfc8785>
//! - **ECMA-262** - `Number::toString` and `JSON.stringify`
//!
//! ## Example
//!
//! ```rust
//! use aurora_symbolic::canonicalize::stable_stringify;
//! use serde_json::json;
//!
//! let a = json!({"b": 2, "a": 1});
//! let b = json!({"a": 1, "b": 2});
//!
//! assert_eq!(stable_stringify(&a), stable_stringify(&b));
//! assert_eq!(stable_stringify(&a), r#"{"a":1,"b":2}"#);
//! ```

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;

/// Serializes a JSON value into its canonical string form.
///
/// The output is deterministic: values that differ only in object key order
/// produce identical strings. This function never panics.
///
/// # Example
///
/// ```rust
/// use aurora_symbolic::canonicalize::stable_stringify;
/// use serde_json::json;
///
/// let value = json!({
///     "zulu": true,
///     "alpha": [3, 2, 1],
///     "bravo": null
/// });
///
/// assert_eq!(
///     stable_stringify(&value),
///     r#"{"alpha":[3,2,1],"bravo":null,"zulu":true}"#
/// );
/// ```
pub fn stable_stringify(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Lowercase hex SHA-256 of the canonical form of `value`.
///
/// This is the digest stored in every [`SealInfo`](crate::SealInfo).
pub fn digest_hex(value: &Value) -> String {
    let canonical = stable_stringify(value);
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&canonicalize_number(n)),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(map, out),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut String) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| compare_utf16(a, b));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(key, out);
        out.push(':');
        write_value(value, out);
    }
    out.push('}');
}

/// Escapes a string the way `JSON.stringify` does.
fn write_string(s: &str, out: &mut String) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn canonicalize_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => format_float(f),
        None => n.to_string(),
    }
}

/// Formats a float in ECMAScript `Number#toString` shape.
///
/// Rust's `Display` and `LowerExp` both emit the shortest digits that
/// round-trip, which is what ECMAScript requires; only the switch between
/// plain and exponent notation and the exponent sign need adjusting.
fn format_float(f: f64) -> String {
    if !f.is_finite() {
        return "null".to_string();
    }
    if f == 0.0 {
        // covers -0
        return "0".to_string();
    }

    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", f);
    }

    let exp = format!("{:e}", f);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// Compares two strings by their UTF-16 code unit sequences.
fn compare_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}
