//! Notification field types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The visible alert of a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alert {
    /// Plain message text.
    Text(String),
    /// Structured alert (`title`, `body`, `loc-key`, `loc-args`, ...).
    Document(Map<String, Value>),
}

impl Alert {
    /// Build a structured alert with a title and body.
    pub fn titled(title: impl Into<String>, body: impl Into<String>) -> Self {
        let mut doc = Map::new();
        let _ = doc.insert("title".to_string(), Value::String(title.into()));
        let _ = doc.insert("body".to_string(), Value::String(body.into()));
        Self::Document(doc)
    }

    /// JSON form placed under `aps.alert`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Document(doc) => Value::Object(doc.clone()),
        }
    }
}

impl From<&str> for Alert {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Alert {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Map<String, Value>> for Alert {
    fn from(doc: Map<String, Value>) -> Self {
        Self::Document(doc)
    }
}

/// Presence marker for the `content-available` / `mutable-content` flags.
///
/// There is no "off" state: an unset flag is `None` on the notification and
/// a set flag always serializes as the integer `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSet;

impl FlagSet {
    /// Wire value of a set flag.
    pub const WIRE_VALUE: u8 = 1;

    /// JSON form of a set flag.
    pub fn to_value(self) -> Value {
        Value::from(Self::WIRE_VALUE)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_alert_deserializes_from_string() {
        let alert: Alert = serde_json::from_str(r#""Hello""#).unwrap();
        assert_eq!(alert, Alert::Text("Hello".to_string()));
    }

    #[test]
    fn document_alert_deserializes_from_object() {
        let alert: Alert = serde_json::from_str(r#"{"title": "T", "body": "B"}"#).unwrap();
        assert_eq!(alert, Alert::titled("T", "B"));
    }

    #[test]
    fn alert_value_shapes() {
        assert_eq!(Alert::from("hi").to_value(), serde_json::json!("hi"));
        assert_eq!(
            Alert::titled("T", "B").to_value(),
            serde_json::json!({ "title": "T", "body": "B" })
        );
    }

    #[test]
    fn alert_rejects_numbers() {
        assert!(serde_json::from_str::<Alert>("42").is_err());
    }

    #[test]
    fn flag_serializes_as_one() {
        assert_eq!(FlagSet.to_value(), serde_json::json!(1));
    }
}
