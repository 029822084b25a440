//! Recursive merge of YAML configuration trees.

use serde_yaml::Value;

/// Merge `overlay` on top of `base` and return the result.
///
/// Mappings present on both sides are merged key by key. Any other
/// combination, including a mapping meeting a scalar, takes the overlay
/// value outright. Neither input is modified.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        _ => overlay.clone(),
    }
}
