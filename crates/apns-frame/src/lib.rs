//! # apns-frame
//!
//! Notification payload model and binary frame encoder for the legacy
//! APNs binary gateway.
//!
//! - **Notification**: [`Notification`] holds the fields, memoises the
//!   payload encoding and packs the frame
//! - **Options**: [`NotificationOptions`] bulk-initialises a notification
//!   from a JSON map, string or file
//! - **Payload**: [`PayloadFields`] builds the `aps` document and merges
//!   custom keys; [`EncodedPayload`] is its compact JSON form
//! - **Frame**: [`frame::pack`] writes the wire layout; [`Frame`] reads it back
//! - **Errors**: [`NotificationError`] via `thiserror`
//!
//! The crate performs no I/O beyond optionally reading an options file.
//! Sending frames over a socket is left to the caller.
//!
//! # Usage
//!
//! ```no_run
//! use apns_frame::Notification;
//!
//! let mut notification = Notification::new();
//! notification.set_device_token("740f4707 bebcf74f 9b7c25d4 8e335894 5f6aa01d a5ddb387 462c7eaf 61bb78ad");
//! notification.set_alert("Hello");
//! notification.set_badge(1);
//! let frame = notification.to_bytes()?;
//! # Ok::<(), apns_frame::NotificationError>(())
//! ```

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod frame;
pub mod merge;
pub mod notification;
pub mod options;
pub mod payload;
pub mod token;
pub mod types;

pub use errors::{NotificationError, Result};
pub use frame::Frame;
pub use merge::deep_merge;
pub use notification::Notification;
pub use options::NotificationOptions;
pub use payload::{EncodedPayload, PayloadFields};
pub use token::DeviceToken;
pub use types::{Alert, FlagSet};
