//! Deep merge of JSON documents.
//!
//! Objects merge key by key, recursively. Anything else (arrays, strings,
//! numbers, booleans, null, or an object meeting a non-object) is replaced
//! outright by the overlay. Arrays are never concatenated.

use serde_json::{Map, Value};

/// Merge `overlay` onto `base`, returning a new value.
///
/// Neither input is modified. Keys keep `base`'s order; keys new in `overlay`
/// are appended in `overlay`'s order.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let value = match merged.get(key) {
                    Some(existing @ Value::Object(_)) if overlay_value.is_object() => {
                        deep_merge(existing, overlay_value)
                    }
                    _ => overlay_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Fold documents left to right onto an empty object. Later documents win.
pub fn merge_all<'a, I>(documents: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    documents
        .into_iter()
        .fold(Value::Object(Map::new()), |acc, next| deep_merge(&acc, next))
}
