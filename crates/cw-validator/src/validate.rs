//! Stateless validation of a candidate [`BlockEvent`].
//!
//! No I/O, no chain lookups: every check here is a pure function of the
//! submitted JSON. The canonical signing payload is computed from the raw
//! JSON value (not the already-typed struct) because it must reproduce
//! exactly what the submitter signed, key order and all.

use crate::error::ValidationError;
use cw_types::{BlockEvent, Capacity, Hash32, PubKey32, Sig64};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Deserialize, Default)]
struct RawEvent {
    event_id: Option<String>,
    #[serde(default)]
    block_index: Option<u64>,
    block_hash: Option<String>,
    #[serde(default)]
    cid: Option<String>,
    miner_address: Option<String>,
    capacity: Option<String>,
    work_score: Option<f64>,
    ts: Option<f64>,
    signature: Option<String>,
    public_key: Option<String>,
}

fn non_empty(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Validate `raw` (a JSON object matching the ingest payload shape) and,
/// if it passes every rule, return the fully-typed [`BlockEvent`].
pub fn validate_event(raw: &Value) -> Result<BlockEvent, ValidationError> {
    let parsed: RawEvent =
        serde_json::from_value(raw.clone()).map_err(|_| ValidationError::MissingField("body"))?;

    // Rule 1: required fields present and non-empty.
    let event_id = non_empty("event_id", parsed.event_id)?;
    let block_hash_str = non_empty("block_hash", parsed.block_hash)?;
    let miner_address = non_empty("miner_address", parsed.miner_address)?;
    let ts = parsed.ts.ok_or(ValidationError::MissingField("ts"))?;
    let work_score = parsed
        .work_score
        .ok_or(ValidationError::MissingField("work_score"))?;

    let block_hash = Hash32::from_hex(&block_hash_str).map_err(|_| ValidationError::BadHex {
        field: "block_hash",
    })?;

    // Rule 2: signature and public_key hex shape.
    let signature_str = non_empty("signature", parsed.signature)?;
    let public_key_str = non_empty("public_key", parsed.public_key)?;

    if signature_str.len() != Sig64::HEX_LEN {
        return Err(ValidationError::BadSigLength {
            actual: signature_str.len(),
        });
    }
    if public_key_str.len() != PubKey32::HEX_LEN {
        return Err(ValidationError::BadKeyLength {
            actual: public_key_str.len(),
        });
    }
    let signature = Sig64::from_hex(&signature_str).map_err(|_| ValidationError::BadHex {
        field: "signature",
    })?;
    let public_key = PubKey32::from_hex(&public_key_str).map_err(|_| ValidationError::BadHex {
        field: "public_key",
    })?;

    // Rule 3: Ed25519 signature over the canonical payload.
    let signing_bytes = cw_crypto::canonicalize_event(raw)
        .ok_or(ValidationError::MissingField("body"))?;
    cw_crypto::verify(&public_key, &signing_bytes, &signature)
        .map_err(|_| ValidationError::BadSignature)?;

    // Rule 4: work_score and capacity.
    if work_score <= 0.0 {
        return Err(ValidationError::NonPositiveWork(work_score));
    }
    let capacity_str = non_empty("capacity", parsed.capacity)?;
    let capacity =
        Capacity::from_str(&capacity_str).map_err(|_| ValidationError::BadCapacity(capacity_str))?;

    Ok(BlockEvent {
        event_id,
        block_index: parsed.block_index.unwrap_or(0),
        block_hash,
        cid: parsed.cid.unwrap_or_default(),
        miner_address,
        capacity,
        work_score,
        ts,
        signature,
        public_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_crypto::Ed25519KeyPair;
    use serde_json::json;

    fn signed_payload(kp: &Ed25519KeyPair, mut fields: serde_json::Map<String, Value>) -> Value {
        let unsigned = Value::Object(fields.clone());
        let signing_bytes = cw_crypto::canonicalize_event(&unsigned).unwrap();
        let sig = kp.sign(&signing_bytes);
        fields.insert("signature".to_string(), json!(sig.to_hex()));
        fields.insert("public_key".to_string(), json!(kp.public_key().to_hex()));
        Value::Object(fields)
    }

    fn base_fields() -> serde_json::Map<String, Value> {
        let mut m = serde_json::Map::new();
        m.insert("event_id".to_string(), json!("e-1"));
        m.insert("block_index".to_string(), json!(1));
        m.insert("block_hash".to_string(), json!("aa".repeat(32)));
        m.insert("cid".to_string(), json!(""));
        m.insert("miner_address".to_string(), json!("miner-1"));
        m.insert("capacity".to_string(), json!("MOBILE"));
        m.insert("work_score".to_string(), json!(1.0));
        m.insert("ts".to_string(), json!(1_700_000_000.0));
        m
    }

    #[test]
    fn accepts_a_well_formed_signed_event() {
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let payload = signed_payload(&kp, base_fields());
        let event = validate_event(&payload).unwrap();
        assert_eq!(event.event_id, "e-1");
        assert_eq!(event.capacity, Capacity::Mobile);
    }

    #[test]
    fn rejects_missing_required_field() {
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let mut fields = base_fields();
        fields.remove("event_id");
        let payload = signed_payload(&kp, fields);
        assert_eq!(
            validate_event(&payload),
            Err(ValidationError::MissingField("event_id"))
        );
    }

    #[test]
    fn rejects_non_hex_signature() {
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let mut payload = signed_payload(&kp, base_fields());
        payload["signature"] = json!("zz".repeat(64));
        assert_eq!(
            validate_event(&payload),
            Err(ValidationError::BadHex { field: "signature" })
        );
    }

    #[test]
    fn rejects_wrong_length_signature() {
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let mut payload = signed_payload(&kp, base_fields());
        payload["signature"] = json!("aa");
        assert_eq!(
            validate_event(&payload),
            Err(ValidationError::BadSigLength { actual: 2 })
        );
    }

    #[test]
    fn rejects_tampered_payload_as_bad_signature() {
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let mut payload = signed_payload(&kp, base_fields());
        payload["work_score"] = json!(999.0);
        assert_eq!(validate_event(&payload), Err(ValidationError::BadSignature));
    }

    #[test]
    fn rejects_non_positive_work_score() {
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let mut fields = base_fields();
        fields.insert("work_score".to_string(), json!(0.0));
        let payload = signed_payload(&kp, fields);
        assert_eq!(
            validate_event(&payload),
            Err(ValidationError::NonPositiveWork(0.0))
        );
    }

    #[test]
    fn rejects_unknown_capacity() {
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let mut fields = base_fields();
        fields.insert("capacity".to_string(), json!("TOASTER"));
        let payload = signed_payload(&kp, fields);
        assert_eq!(
            validate_event(&payload),
            Err(ValidationError::BadCapacity("TOASTER".to_string()))
        );
    }

    #[test]
    fn accepts_capacity_case_insensitively() {
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let mut fields = base_fields();
        fields.insert("capacity".to_string(), json!("server"));
        let payload = signed_payload(&kp, fields);
        assert_eq!(validate_event(&payload).unwrap().capacity, Capacity::Server);
    }
}
