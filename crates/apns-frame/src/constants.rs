//! Wire-format constants for the legacy binary gateway.

/// Command byte that opens every frame (enhanced notification format).
pub const FRAME_COMMAND: u8 = 1;

/// Size of a decoded device token on the wire.
pub const DEVICE_TOKEN_BYTES: usize = 32;

/// Hex characters in a device token (two per byte).
pub const DEVICE_TOKEN_HEX_LEN: usize = DEVICE_TOKEN_BYTES * 2;

/// Largest encoded payload the gateway accepts.
pub const MAX_PAYLOAD_BYTES: usize = 2048;

/// Bytes in front of the payload: command, identifier, expiry,
/// token length, token, payload length.
pub const FRAME_HEADER_BYTES: usize = 1 + 4 + 4 + 2 + DEVICE_TOKEN_BYTES + 2;

/// Reserved top-level key grouping the standard notification fields.
pub const APS_KEY: &str = "aps";
