//! Hashing System - SHA-256 Fingerprints
//!
//! Stable fingerprints for projects and compiled HTML, so two compiles of the
//! same input can be compared without diffing markup.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(sorted.into_iter().map(|(k, v)| (k.clone(), sort_value(v))).collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Fingerprint of a project's settings and components.
pub fn compute_project_hash<T: Serialize>(project: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(project)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

pub fn compute_html_hash(html: &str) -> String {
    sha256_hex(html.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            compute_html_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_project_hash_ignores_key_order() {
        let a = json!({
            "settings": {"fontFamily": "Arial", "buttonStyle": "pill"},
            "components": []
        });
        let b = json!({
            "components": [],
            "settings": {"buttonStyle": "pill", "fontFamily": "Arial"}
        });
        assert_eq!(compute_project_hash(&a).unwrap(), compute_project_hash(&b).unwrap());
    }
}
