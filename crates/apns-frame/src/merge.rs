//! Recursive merge of JSON documents.
//!
//! Merge rules:
//! - Objects are merged recursively (override wins per-key)
//! - Arrays, primitives and `null` from the override replace the base entirely
//! - Existing keys keep their position; new keys are appended in overlay order

use serde_json::{Map, Value};

/// Deep-merge `overlay` on top of `base`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(deep_merge_maps(base_map, overlay_map))
        }
        (_, overlay) => overlay,
    }
}

/// Deep-merge two object maps, `overlay` winning on scalar collisions.
pub fn deep_merge_maps(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_val) in overlay {
        match base.get_mut(&key) {
            Some(base_val) => {
                let previous = std::mem::take(base_val);
                *base_val = deep_merge(previous, overlay_val);
            }
            None => {
                let _ = base.insert(key, overlay_val);
            }
        }
    }
    base
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
