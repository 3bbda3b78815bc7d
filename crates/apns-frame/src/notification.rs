//! The notification request and its encoder.
//!
//! A [`Notification`] owns its field state plus a memoised payload encoding.
//! Every setter clears the memo, and the next read rebuilds it, so a frame
//! always reflects the current fields.
//!
//! The memo uses [`OnceCell`], which makes `Notification` `!Sync`: sharing
//! one instance across threads needs an outer lock around both writes and
//! reads.

use std::cell::OnceCell;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::constants::MAX_PAYLOAD_BYTES;
use crate::errors::{NotificationError, Result};
use crate::frame;
use crate::options::{NotificationOptions, expiry_from_datetime};
use crate::payload::{EncodedPayload, PayloadFields};
use crate::token::DeviceToken;
use crate::types::{Alert, FlagSet};

/// A single push notification addressed to one device.
#[derive(Debug, Clone, Default)]
pub struct Notification {
    device_token: Option<DeviceToken>,
    identifier: u32,
    expiry: u32,
    fields: PayloadFields,
    encoded: OnceCell<EncodedPayload>,
    sent_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Create an empty notification (identifier and expiry are `0`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notification from bulk options.
    pub fn from_options(options: NotificationOptions) -> Self {
        let mut notification = Self::new();
        notification.apply(options);
        notification
    }

    /// Create a notification from a JSON object of field name to value.
    ///
    /// Unknown keys fail with [`NotificationError::UnrecognizedField`].
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        NotificationOptions::from_map(map).map(Self::from_options)
    }

    /// Apply every field present in `options` through its setter.
    pub fn apply(&mut self, options: NotificationOptions) {
        let NotificationOptions {
            device_token,
            alert,
            badge,
            sound,
            expiry,
            identifier,
            content_available,
            mutable_content,
            category,
            thread_id,
            custom,
        } = options;

        if let Some(token) = device_token {
            self.set_device_token(token);
        }
        if let Some(alert) = alert {
            self.set_alert(alert);
        }
        if let Some(badge) = badge {
            self.set_badge(badge);
        }
        if let Some(sound) = sound {
            self.set_sound(sound);
        }
        if let Some(expiry) = expiry {
            self.set_expiry(expiry);
        }
        if let Some(identifier) = identifier {
            self.set_identifier(identifier);
        }
        if let Some(flag) = content_available {
            self.set_content_available(flag);
        }
        if let Some(flag) = mutable_content {
            self.set_mutable_content(flag);
        }
        if let Some(category) = category {
            self.set_category(category);
        }
        if let Some(thread_id) = thread_id {
            self.set_thread_id(thread_id);
        }
        if let Some(custom) = custom {
            self.set_custom(custom);
        }
    }

    // ── Setters ─────────────────────────────────────────────────────────

    /// Set the destination device token; whitespace is stripped.
    pub fn set_device_token(&mut self, token: impl Into<DeviceToken>) {
        self.device_token = Some(token.into());
        self.invalidate();
    }

    /// Set the correlation id echoed back by the gateway on error.
    pub fn set_identifier(&mut self, identifier: u32) {
        self.identifier = identifier;
        self.invalidate();
    }

    /// Set the expiry as a UNIX timestamp (`0` means do not store).
    pub fn set_expiry(&mut self, expiry: u32) {
        self.expiry = expiry;
        self.invalidate();
    }

    /// Set the expiry from a UTC datetime.
    pub fn set_expiry_at(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.set_expiry(expiry_from_datetime(at)?);
        Ok(())
    }

    /// Set the alert text or structured alert.
    pub fn set_alert(&mut self, alert: impl Into<Alert>) {
        self.fields.alert = Some(alert.into());
        self.invalidate();
    }

    /// Set the badge number.
    pub fn set_badge(&mut self, badge: u32) {
        self.fields.badge = Some(badge);
        self.invalidate();
    }

    /// Set the sound resource name.
    pub fn set_sound(&mut self, sound: impl Into<String>) {
        self.fields.sound = Some(sound.into());
        self.invalidate();
    }

    /// Set the action category.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.fields.category = Some(category.into());
        self.invalidate();
    }

    /// Set the thread grouping identifier.
    pub fn set_thread_id(&mut self, thread_id: impl Into<String>) {
        self.fields.thread_id = Some(thread_id.into());
        self.invalidate();
    }

    /// Replace the custom top-level document.
    pub fn set_custom(&mut self, custom: Map<String, Value>) {
        self.fields.custom = Some(custom);
        self.invalidate();
    }

    /// Raise the `content-available` flag.
    ///
    /// Passing `false` leaves the flag as it was; once raised it stays raised.
    pub fn set_content_available(&mut self, on: bool) {
        if on {
            self.fields.content_available = Some(FlagSet);
        }
        self.invalidate();
    }

    /// Raise the `mutable-content` flag.
    ///
    /// Passing `false` leaves the flag as it was; once raised it stays raised.
    pub fn set_mutable_content(&mut self, on: bool) {
        if on {
            self.fields.mutable_content = Some(FlagSet);
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        let _ = self.encoded.take();
    }

    // ── Getters ─────────────────────────────────────────────────────────

    /// Sanitised device token, if set.
    pub fn device_token(&self) -> Option<&DeviceToken> {
        self.device_token.as_ref()
    }

    /// Correlation id.
    pub fn identifier(&self) -> u32 {
        self.identifier
    }

    /// Expiry UNIX timestamp.
    pub fn expiry(&self) -> u32 {
        self.expiry
    }

    /// Alert, if set.
    pub fn alert(&self) -> Option<&Alert> {
        self.fields.alert.as_ref()
    }

    /// Badge, if set.
    pub fn badge(&self) -> Option<u32> {
        self.fields.badge
    }

    /// Sound, if set.
    pub fn sound(&self) -> Option<&str> {
        self.fields.sound.as_deref()
    }

    /// Category, if set.
    pub fn category(&self) -> Option<&str> {
        self.fields.category.as_deref()
    }

    /// Thread id, if set.
    pub fn thread_id(&self) -> Option<&str> {
        self.fields.thread_id.as_deref()
    }

    /// Custom document, if set.
    pub fn custom(&self) -> Option<&Map<String, Value>> {
        self.fields.custom.as_ref()
    }

    /// Whether `content-available` is raised.
    pub fn is_content_available(&self) -> bool {
        self.fields.content_available.is_some()
    }

    /// Whether `mutable-content` is raised.
    pub fn is_mutable_content(&self) -> bool {
        self.fields.mutable_content.is_some()
    }

    /// Whether a thread id is present.
    pub fn has_thread_id(&self) -> bool {
        self.fields.thread_id.is_some()
    }

    // ── Payload ─────────────────────────────────────────────────────────

    /// The payload document built from the current fields.
    pub fn payload(&self) -> Value {
        self.fields.document()
    }

    /// The memoised compact encoding of [`payload`](Self::payload).
    pub fn encoded_payload(&self) -> &EncodedPayload {
        self.encoded.get_or_init(|| {
            let encoded = EncodedPayload::encode(&self.fields.document());
            debug!(bytes = encoded.len(), "payload encoded");
            encoded
        })
    }

    /// The encoded payload bytes.
    pub fn payload_bytes(&self) -> &[u8] {
        self.encoded_payload().as_bytes()
    }

    /// Check content presence and payload size.
    pub fn validate_payload(&self) -> Result<()> {
        if !self.fields.has_content() {
            debug!(identifier = self.identifier, "notification has no content");
            return Err(NotificationError::MissingContent);
        }
        let size = self.encoded_payload().len();
        if size > MAX_PAYLOAD_BYTES {
            debug!(
                identifier = self.identifier,
                size,
                max = MAX_PAYLOAD_BYTES,
                "payload too large"
            );
            return Err(NotificationError::PayloadTooLarge {
                size,
                max: MAX_PAYLOAD_BYTES,
            });
        }
        Ok(())
    }

    /// Whether [`validate_payload`](Self::validate_payload) would succeed.
    pub fn is_valid(&self) -> bool {
        self.validate_payload().is_ok()
    }

    // ── Frame ───────────────────────────────────────────────────────────

    /// Validate and pack the notification into a wire frame.
    pub fn to_bytes(&self) -> Result<Bytes> {
        self.validate_payload().inspect_err(|e| {
            warn!(identifier = self.identifier, error = %e, "notification rejected");
        })?;
        let token = self
            .device_token
            .as_ref()
            .ok_or(NotificationError::MissingDeviceToken)?;
        let token_bytes = token.to_bytes()?;
        let payload = self.encoded_payload();

        trace!(
            identifier = self.identifier,
            expiry = self.expiry,
            token_prefix = %token.prefix(),
            payload_len = payload.len(),
            "packing frame"
        );
        frame::pack(self.identifier, self.expiry, &token_bytes, payload.as_bytes())
    }

    // ── Delivery bookkeeping ────────────────────────────────────────────

    /// Record that the frame was handed to the transport.
    pub fn mark_as_sent(&mut self) {
        self.mark_as_sent_at(Utc::now());
    }

    /// Record a send at a specific time.
    pub fn mark_as_sent_at(&mut self, at: DateTime<Utc>) {
        debug!(identifier = self.identifier, sent_at = %at, "notification marked as sent");
        self.sent_at = Some(at);
    }

    /// Clear the sent marker so the notification can be resent.
    pub fn mark_as_unsent(&mut self) {
        debug!(identifier = self.identifier, "notification marked as unsent");
        self.sent_at = None;
    }

    /// Whether the notification has been marked as sent.
    pub fn is_sent(&self) -> bool {
        self.sent_at.is_some()
    }

    /// When the notification was marked as sent.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
