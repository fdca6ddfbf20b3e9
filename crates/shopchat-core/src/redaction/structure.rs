//! Deep sanitizer for arbitrary JSON metadata

use serde_json::{Map, Value};
use shopchat_core_types::schema::{FIELD_TRUNCATED, OMITTED, REDACTED, TRUNCATED};

use super::patterns::{classify_key, KeyClass};
use super::strings::scrub_value_string;

/// Containers nested deeper than this are replaced by `[Truncated]`.
pub const MAX_DEPTH: usize = 6;

/// Arrays keep this many leading elements.
pub const MAX_ARRAY_ITEMS: usize = 50;

/// Objects keep this many entries, then gain a `__truncated__: true` marker.
pub const MAX_OBJECT_ENTRIES: usize = 100;

/// Recursively sanitize a JSON value.
///
/// Key names decide first (allowlist, body, sensitive), value shapes second.
/// The function is total: every input yields a value, and markers it writes
/// are fixed points, so redacting twice gives the same result.
pub fn redact_structure(value: &Value) -> Value {
    redact_at(value, 0)
}

fn redact_at(value: &Value, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return match value {
            Value::Null => Value::Null,
            _ => Value::String(TRUNCATED.to_string()),
        };
    }

    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        Value::String(s) => Value::String(scrub_value_string(s)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .take(MAX_ARRAY_ITEMS)
                .map(|item| redact_at(item, depth + 1))
                .collect(),
        ),
        Value::Object(map) => Value::Object(redact_object(map, depth)),
    }
}

fn redact_object(map: &Map<String, Value>, depth: usize) -> Map<String, Value> {
    let mut out = Map::new();
    for (index, (key, value)) in map.iter().enumerate() {
        if index >= MAX_OBJECT_ENTRIES {
            out.insert(FIELD_TRUNCATED.to_string(), Value::Bool(true));
            break;
        }
        let redacted = match classify_key(key) {
            KeyClass::Body => Value::String(OMITTED.to_string()),
            KeyClass::Sensitive => Value::String(REDACTED.to_string()),
            KeyClass::Allowed | KeyClass::Plain => redact_at(value, depth + 1),
        };
        out.insert(key.clone(), redacted);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(redact_structure(&Value::Null), Value::Null);
        assert_eq!(redact_structure(&json!(42)), json!(42));
        assert_eq!(redact_structure(&json!(true)), json!(true));
        assert_eq!(redact_structure(&json!(1.5)), json!(1.5));
    }

    #[test]
    fn test_sensitive_keys_are_replaced_regardless_of_value() {
        let out = redact_structure(&json!({
            "accessToken": "harmless",
            "password": 1234,
            "state": {"nested": "object"},
            "topic": "app/uninstalled",
        }));
        assert_eq!(out["accessToken"], REDACTED);
        assert_eq!(out["password"], REDACTED);
        assert_eq!(out["state"], REDACTED);
        assert_eq!(out["topic"], "app/uninstalled");
    }

    #[test]
    fn test_body_keys_are_omitted() {
        let out = redact_structure(&json!({
            "payload": {"customer": {"email": "a@b.co"}},
            "rawBody": "{\"token\":\"shpat_x\"}",
        }));
        assert_eq!(out["payload"], OMITTED);
        assert_eq!(out["rawBody"], OMITTED);
    }

    #[test]
    fn test_allowlisted_keys_still_get_value_scrubbing() {
        let out = redact_structure(&json!({
            "shop": "demo.myshopify.com",
            "shopDomain": "shpat_leaked_here",
            "merchantId": "gid-42",
        }));
        assert_eq!(out["shop"], "demo.myshopify.com");
        assert_eq!(out["shopDomain"], REDACTED);
        assert_eq!(out["merchantId"], "gid-42");
    }

    #[test]
    fn test_nested_values_are_scrubbed() {
        let out = redact_structure(&json!({
            "nested": {"hmac": "deadbeef", "note": "call 555-123-4567"},
            "list": ["shpat_abc", "2feb21ca-d583-4d96-888c-e0af91f64305"],
        }));
        assert_eq!(out["nested"]["hmac"], REDACTED);
        assert_eq!(out["nested"]["note"], "call [REDACTED_PHONE]");
        assert_eq!(out["list"][0], REDACTED);
        assert_eq!(out["list"][1], "2feb21ca-d583-4d96-888c-e0af91f64305");
    }

    #[test]
    fn test_arrays_are_truncated() {
        let items: Vec<u32> = (0..75).collect();
        let out = redact_structure(&json!({ "items": items }));
        let kept = out["items"].as_array().unwrap();
        assert_eq!(kept.len(), MAX_ARRAY_ITEMS);
        assert_eq!(kept[49], json!(49));
    }

    #[test]
    fn test_objects_are_capped_with_marker() {
        let mut map = Map::new();
        for i in 0..150 {
            map.insert(format!("k{i:03}"), json!(i));
        }
        let out = redact_structure(&Value::Object(map));
        let out = out.as_object().unwrap();
        assert_eq!(out.len(), MAX_OBJECT_ENTRIES + 1);
        assert_eq!(out[FIELD_TRUNCATED], json!(true));
    }

    #[test]
    fn test_depth_is_capped() {
        let deep = json!({"a": {"b": {"c": {"d": {"e": {"f": {"g": {"h": "bottom"}}}}}}}});
        let out = redact_structure(&deep);
        assert!(out["a"]["b"]["c"]["d"]["e"]["f"].is_object());
        assert_eq!(out["a"]["b"]["c"]["d"]["e"]["f"]["g"], TRUNCATED);
    }

    #[test]
    fn test_redaction_is_idempotent() {
        let mut wide = Map::new();
        for i in 0..120 {
            wide.insert(format!("field{i}"), json!(format!("value {i}")));
        }
        let input = json!({
            "accessToken": "shpat_1234567890",
            "payload": {"x": 1},
            "wide": wide,
            "deep": {"a": {"b": {"c": {"d": {"e": {"f": {"g": 1}}}}}}},
            "text": "Bearer abc.def.ghi",
        });
        let once = redact_structure(&input);
        let twice = redact_structure(&once);
        assert_eq!(once, twice);
    }
}
