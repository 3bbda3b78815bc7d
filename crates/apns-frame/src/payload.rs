//! Payload document construction and compact JSON encoding.
//!
//! The document has one reserved key, `aps`, holding the standard fields.
//! Caller-supplied custom keys are deep-merged on top at the root, so they
//! may add siblings of `aps` or extend `aps` itself. A custom `aps` that is
//! not an object is dropped; it never replaces the reserved dictionary.
//!
//! Keys keep insertion order: `aps` first, its fields in the order below,
//! then custom keys in the order the caller supplied them.

use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::APS_KEY;
use crate::merge::deep_merge_maps;
use crate::types::{Alert, FlagSet};

/// Fields that feed the payload document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadFields {
    /// Alert text or structured alert.
    pub alert: Option<Alert>,
    /// App icon badge number.
    pub badge: Option<u32>,
    /// Sound resource name.
    pub sound: Option<String>,
    /// `content-available` flag.
    pub content_available: Option<FlagSet>,
    /// `mutable-content` flag.
    pub mutable_content: Option<FlagSet>,
    /// Interactive action category.
    pub category: Option<String>,
    /// Thread grouping identifier.
    pub thread_id: Option<String>,
    /// Extra top-level keys.
    pub custom: Option<Map<String, Value>>,
}

impl PayloadFields {
    /// Whether there is something for the device to act on.
    ///
    /// An empty custom document does not count, nor does one holding only
    /// a non-object `aps`.
    pub fn has_content(&self) -> bool {
        self.alert.is_some()
            || self.badge.is_some()
            || self
                .custom
                .as_ref()
                .is_some_and(|custom| custom.iter().any(|(key, value)| is_mergeable(key, value)))
    }

    /// Build the `aps` dictionary, leaving out absent fields.
    pub fn aps(&self) -> Map<String, Value> {
        let mut aps = Map::new();
        if let Some(ref alert) = self.alert {
            let _ = aps.insert("alert".to_string(), alert.to_value());
        }
        if let Some(badge) = self.badge {
            let _ = aps.insert("badge".to_string(), Value::from(badge));
        }
        if let Some(ref sound) = self.sound {
            let _ = aps.insert("sound".to_string(), Value::from(sound.as_str()));
        }
        if let Some(flag) = self.content_available {
            let _ = aps.insert("content-available".to_string(), flag.to_value());
        }
        if let Some(flag) = self.mutable_content {
            let _ = aps.insert("mutable-content".to_string(), flag.to_value());
        }
        if let Some(ref category) = self.category {
            let _ = aps.insert("category".to_string(), Value::from(category.as_str()));
        }
        if let Some(ref thread_id) = self.thread_id {
            let _ = aps.insert("thread-id".to_string(), Value::from(thread_id.as_str()));
        }
        aps
    }

    /// Build the full payload document.
    pub fn document(&self) -> Value {
        let mut root = Map::new();
        let _ = root.insert(APS_KEY.to_string(), Value::Object(self.aps()));
        match self.custom {
            Some(ref custom) => Value::Object(deep_merge_maps(root, mergeable_custom(custom))),
            None => Value::Object(root),
        }
    }
}

fn is_mergeable(key: &str, value: &Value) -> bool {
    key != APS_KEY || value.is_object()
}

/// Copy of `custom` without a non-object `aps` entry.
fn mergeable_custom(custom: &Map<String, Value>) -> Map<String, Value> {
    custom
        .iter()
        .filter(|(key, value)| {
            let keep = is_mergeable(key, value);
            if !keep {
                debug!(value = %value, "ignoring non-object custom `aps`");
            }
            keep
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Compact JSON encoding of a payload document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    json: String,
}

impl EncodedPayload {
    /// Serialize a document without insignificant whitespace.
    pub fn encode(document: &Value) -> Self {
        Self {
            json: document.to_string(),
        }
    }

    /// The JSON text.
    pub fn as_str(&self) -> &str {
        &self.json
    }

    /// The UTF-8 bytes sent on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        self.json.as_bytes()
    }

    /// Size in bytes (not characters).
    pub fn len(&self) -> usize {
        self.json.len()
    }

    /// Whether the encoding is empty (never true for a built document).
    pub fn is_empty(&self) -> bool {
        self.json.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
