//! Canonical serialization used as the Ed25519 signing payload.
//!
//! The signed payload is the event's JSON object, sorted by key, with the
//! `signature` and `public_key` fields removed and no insignificant
//! whitespace. `serde_json::Value::Object` is backed by a `BTreeMap` when
//! the `preserve_order` feature is off (the default here), so re-emitting
//! a parsed object already yields sorted keys.

use serde_json::Value;

/// Build the canonical signing bytes for a JSON event payload.
pub fn canonicalize_event(raw: &Value) -> Option<Vec<u8>> {
    let map = raw.as_object()?;
    let mut stripped = serde_json::Map::new();
    for (key, value) in map {
        if key == "signature" || key == "public_key" {
            continue;
        }
        stripped.insert(key.clone(), value.clone());
    }
    serde_json::to_vec(&Value::Object(stripped)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_signature_and_public_key() {
        let raw = json!({
            "event_id": "e-1",
            "signature": "aa",
            "public_key": "bb",
            "work_score": 1.0,
        });
        let bytes = canonicalize_event(&raw).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("signature"));
        assert!(!text.contains("public_key"));
        assert!(text.contains("event_id"));
    }

    #[test]
    fn sorts_keys_regardless_of_input_order() {
        let a = json!({"z": 1, "a": 2, "signature": "x", "public_key": "y"});
        let b = json!({"a": 2, "z": 1, "signature": "x", "public_key": "y"});
        assert_eq!(
            canonicalize_event(&a).unwrap(),
            canonicalize_event(&b).unwrap()
        );
    }

    #[test]
    fn non_object_input_returns_none() {
        assert!(canonicalize_event(&json!([1, 2, 3])).is_none());
    }
}
