//! Construction options for a notification.
//!
//! [`NotificationOptions`] is the bulk-initialisation form of a
//! [`Notification`](crate::Notification): every recognised field is listed
//! here, and any other key is rejected with
//! [`NotificationError::UnrecognizedField`].
//!
//! Options can come from a JSON map, a JSON string or a JSON file:
//!
//! ```no_run
//! use apns_frame::{Notification, NotificationOptions};
//!
//! let options = NotificationOptions::from_json_str(
//!     r#"{"device_token": "740f4707 bebcf74f ...", "alert": "Hello", "expiry": "1700000000"}"#,
//! )?;
//! let notification = Notification::from_options(options);
//! # Ok::<(), apns_frame::NotificationError>(())
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{NotificationError, Result};
use crate::token::DeviceToken;
use crate::types::Alert;

/// Keys accepted by [`NotificationOptions`].
pub const FIELDS: &[&str] = &[
    "device_token",
    "alert",
    "badge",
    "sound",
    "expiry",
    "identifier",
    "content_available",
    "mutable_content",
    "category",
    "thread_id",
    "custom",
];

/// Recognised notification fields, all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationOptions {
    /// Destination device token (whitespace is stripped).
    #[serde(default)]
    pub device_token: Option<DeviceToken>,
    /// Alert text or structured alert.
    #[serde(default)]
    pub alert: Option<Alert>,
    /// App icon badge number.
    #[serde(default)]
    pub badge: Option<u32>,
    /// Sound resource name.
    #[serde(default)]
    pub sound: Option<String>,
    /// UNIX timestamp after which the gateway may drop the notification.
    #[serde(default, deserialize_with = "deserialize_expiry")]
    pub expiry: Option<u32>,
    /// Caller-chosen correlation id echoed back by the gateway on error.
    #[serde(default)]
    pub identifier: Option<u32>,
    /// Background update flag.
    #[serde(default)]
    pub content_available: Option<bool>,
    /// Notification service extension flag.
    #[serde(default)]
    pub mutable_content: Option<bool>,
    /// Interactive action category.
    #[serde(default)]
    pub category: Option<String>,
    /// Thread grouping identifier.
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Extra top-level payload keys, deep-merged with `aps`.
    #[serde(default)]
    pub custom: Option<Map<String, Value>>,
}

impl NotificationOptions {
    /// Build options from a JSON object, rejecting unknown keys.
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        if let Some(field) = map.keys().find(|key| !FIELDS.contains(&key.as_str())) {
            return Err(NotificationError::UnrecognizedField {
                field: field.clone(),
            });
        }
        if let Some(expiry) = map.get("expiry") {
            let _ = coerce_expiry(expiry)?;
        }
        serde_json::from_value(Value::Object(map)).map_err(|e| NotificationError::InvalidOption {
            reason: e.to_string(),
        })
    }

    /// Parse options from JSON text holding a single object.
    pub fn from_json_str(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Self::from_map(map),
            other => Err(NotificationError::InvalidOption {
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Load options from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(?path, "loading notification options from file");
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Coerce a JSON value into a 32-bit UNIX timestamp.
///
/// Accepts non-negative integers, floats (truncated), numeric strings and
/// RFC 3339 timestamps. `null` maps to `0`.
pub fn coerce_expiry(value: &Value) -> Result<u32> {
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                epoch_from_i128(i128::from(v))
            } else if let Some(v) = n.as_i64() {
                epoch_from_i128(i128::from(v))
            } else {
                n.as_f64().map_or_else(
                    || Err(invalid_expiry(format!("unsupported number {n}"))),
                    epoch_from_f64,
                )
            }
        }
        Value::String(s) => coerce_expiry_str(s.trim()),
        other => Err(invalid_expiry(format!(
            "expected a number or timestamp string, got {}",
            json_kind(other)
        ))),
    }
}

/// Convert a UTC datetime into a 32-bit UNIX timestamp.
pub fn expiry_from_datetime(at: DateTime<Utc>) -> Result<u32> {
    epoch_from_i128(i128::from(at.timestamp()))
}

fn coerce_expiry_str(s: &str) -> Result<u32> {
    if let Ok(v) = s.parse::<i128>() {
        return epoch_from_i128(v);
    }
    if let Ok(v) = s.parse::<f64>() {
        return epoch_from_f64(v);
    }
    DateTime::parse_from_rfc3339(s)
        .map_err(|e| invalid_expiry(format!("`{s}` is not a timestamp: {e}")))
        .and_then(|at| expiry_from_datetime(at.with_timezone(&Utc)))
}

fn epoch_from_i128(v: i128) -> Result<u32> {
    u32::try_from(v).map_err(|_| invalid_expiry(format!("{v} is outside 0..={}", u32::MAX)))
}

fn epoch_from_f64(v: f64) -> Result<u32> {
    if !v.is_finite() || v < 0.0 || v >= f64::from(u32::MAX) + 1.0 {
        return Err(invalid_expiry(format!("{v} is outside 0..={}", u32::MAX)));
    }
    Ok(v.trunc() as u32)
}

fn invalid_expiry(reason: String) -> NotificationError {
    NotificationError::InvalidExpiry { reason }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn deserialize_expiry<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    coerce_expiry(&value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::io::Write;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn empty_map_gives_defaults() {
        let options = NotificationOptions::from_map(Map::new()).unwrap();
        assert_eq!(options, NotificationOptions::default());
    }

    #[test]
    fn all_fields_parse() {
        let options = NotificationOptions::from_map(map(json!({
            "device_token": "ab cd",
            "alert": { "title": "T", "body": "B" },
            "badge": 4,
            "sound": "default",
            "expiry": 1_700_000_000,
            "identifier": 7,
            "content_available": true,
            "mutable_content": false,
            "category": "INVITE",
            "thread_id": "t-1",
            "custom": { "acme": 1 },
        })))
        .unwrap();

        assert_eq!(options.device_token.unwrap().as_str(), "abcd");
        assert_eq!(options.alert, Some(Alert::titled("T", "B")));
        assert_eq!(options.badge, Some(4));
        assert_eq!(options.expiry, Some(1_700_000_000));
        assert_eq!(options.identifier, Some(7));
        assert_eq!(options.content_available, Some(true));
        assert_eq!(options.mutable_content, Some(false));
        assert_eq!(options.thread_id.as_deref(), Some("t-1"));
        assert_eq!(options.custom.unwrap()["acme"], 1);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = NotificationOptions::from_map(map(json!({ "alert": "x", "priority": 10 })));
        assert_matches!(
            result,
            Err(NotificationError::UnrecognizedField { field }) if field == "priority"
        );
    }

    #[test]
    fn wrong_shape_is_invalid_option() {
        let result = NotificationOptions::from_map(map(json!({ "badge": "lots" })));
        assert_matches!(result, Err(NotificationError::InvalidOption { .. }));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let result = NotificationOptions::from_json_str("[1, 2]");
        assert_matches!(result, Err(NotificationError::InvalidOption { reason }) if reason.contains("an array"));
    }

    #[test]
    fn malformed_json_is_json_error() {
        assert_matches!(
            NotificationOptions::from_json_str("{alert"),
            Err(NotificationError::Json(_))
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"alert": "from disk", "badge": 2}"#).unwrap();
        let options = NotificationOptions::from_path(file.path()).unwrap();
        assert_eq!(options.alert, Some(Alert::from("from disk")));
        assert_eq!(options.badge, Some(2));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = NotificationOptions::from_path(&dir.path().join("absent.json"));
        assert_matches!(result, Err(NotificationError::Io(_)));
    }

    // ── Expiry coercion ─────────────────────────────────────────────────

    #[test]
    fn expiry_from_integer() {
        assert_eq!(coerce_expiry(&json!(1_700_000_000)).unwrap(), 1_700_000_000);
    }

    #[test]
    fn expiry_from_float_truncates() {
        assert_eq!(coerce_expiry(&json!(12.9)).unwrap(), 12);
    }

    #[test]
    fn expiry_from_numeric_string() {
        assert_eq!(coerce_expiry(&json!(" 86400 ")).unwrap(), 86_400);
        assert_eq!(coerce_expiry(&json!("86400.5")).unwrap(), 86_400);
    }

    #[test]
    fn expiry_from_rfc3339() {
        assert_eq!(
            coerce_expiry(&json!("2023-11-14T22:13:20Z")).unwrap(),
            1_700_000_000
        );
        assert_eq!(
            coerce_expiry(&json!("2023-11-15T00:13:20+02:00")).unwrap(),
            1_700_000_000
        );
    }

    #[test]
    fn expiry_null_is_zero() {
        assert_eq!(coerce_expiry(&Value::Null).unwrap(), 0);
    }

    #[test]
    fn expiry_out_of_range() {
        assert_matches!(
            coerce_expiry(&json!(-1)),
            Err(NotificationError::InvalidExpiry { .. })
        );
        assert_matches!(
            coerce_expiry(&json!(u64::from(u32::MAX) + 1)),
            Err(NotificationError::InvalidExpiry { .. })
        );
        assert_matches!(
            coerce_expiry(&json!("1969-12-31T23:59:59Z")),
            Err(NotificationError::InvalidExpiry { .. })
        );
    }

    #[test]
    fn expiry_garbage_string() {
        assert_matches!(
            coerce_expiry(&json!("tomorrow")),
            Err(NotificationError::InvalidExpiry { .. })
        );
    }

    #[test]
    fn expiry_wrong_type() {
        assert_matches!(
            coerce_expiry(&json!(true)),
            Err(NotificationError::InvalidExpiry { reason }) if reason.contains("a boolean")
        );
    }

    #[test]
    fn bad_expiry_in_map_is_invalid_expiry() {
        let result = NotificationOptions::from_map(map(json!({ "expiry": "soon" })));
        assert_matches!(result, Err(NotificationError::InvalidExpiry { .. }));
    }

    #[test]
    fn expiry_from_datetime_round_trips() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(expiry_from_datetime(at).unwrap(), 1_700_000_000);
    }
}
