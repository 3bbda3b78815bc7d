//! Notification error types.

use thiserror::Error;

/// Errors raised while building, validating or packing a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// None of alert, badge or a non-empty custom document is set.
    #[error("notification has no alert, badge or custom content")]
    MissingContent,

    /// The encoded payload is larger than the gateway accepts.
    #[error("payload is {size} bytes, maximum is {max}")]
    PayloadTooLarge {
        /// Encoded payload size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// The construction map named a field that does not exist.
    #[error("unrecognized notification field `{field}`")]
    UnrecognizedField {
        /// The offending key.
        field: String,
    },

    /// A recognised field carried a value of the wrong shape.
    #[error("invalid notification options: {reason}")]
    InvalidOption {
        /// Description from the deserializer.
        reason: String,
    },

    /// The expiry could not be coerced to a 32-bit UNIX timestamp.
    #[error("invalid expiry: {reason}")]
    InvalidExpiry {
        /// Error description.
        reason: String,
    },

    /// A frame was requested without a device token.
    #[error("notification has no device token")]
    MissingDeviceToken,

    /// The device token is not 64 hex characters once whitespace is stripped.
    #[error("invalid device token: {reason}")]
    InvalidDeviceToken {
        /// Error description.
        reason: String,
    },

    /// Failed to read an options file from disk.
    #[error("failed to read notification options: {0}")]
    Io(#[from] std::io::Error),

    /// Options text was not valid JSON.
    #[error("failed to parse notification options JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl NotificationError {
    /// Whether the error comes from payload validation.
    ///
    /// These are the failures `Notification::is_valid` folds into `false`.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingContent | Self::PayloadTooLarge { .. })
    }
}

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotificationError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
