use super::*;
use serde_json::json;

fn digest(v: &serde_json::Value) -> TimelineFingerprint {
    let mut h = StableHasher::new();
    h.write_json(v);
    h.finish()
}

#[test]
fn object_key_order_does_not_matter() {
    let a: serde_json::Value = serde_json::from_str(r#"{"a":1,"b":[true,null]}"#).unwrap();
    let b: serde_json::Value = serde_json::from_str(r#"{"b":[true,null],"a":1}"#).unwrap();
    assert_eq!(digest(&a), digest(&b));
}

#[test]
fn type_tags_keep_lookalike_values_apart() {
    assert_ne!(digest(&json!("1")), digest(&json!(1)));
    assert_ne!(digest(&json!([])), digest(&json!({})));
    assert_ne!(digest(&json!(["ab", "c"])), digest(&json!(["a", "bc"])));
}

#[test]
fn display_is_32_hex_digits() {
    let s = digest(&json!({ "id": "x" })).to_string();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}
