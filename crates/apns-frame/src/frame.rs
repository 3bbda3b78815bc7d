//! Binary frame layout.
//!
//! Layout (big-endian):
//! ```text
//! ┌────────┬────────────┬────────┬────────────┬──────────┬─────────────┬─────────┐
//! │ cmd=1  │ identifier │ expiry │ token len  │ token    │ payload len │ payload │
//! │ 1 byte │ 4 bytes    │ 4 bytes│ 2 bytes=32 │ 32 bytes │ 2 bytes     │ N bytes │
//! └────────┴────────────┴────────┴────────────┴──────────┴─────────────┴─────────┘
//! ```
//!
//! The payload carries no padding and no terminator.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use data_encoding::HEXLOWER;

use crate::constants::{DEVICE_TOKEN_BYTES, FRAME_COMMAND, FRAME_HEADER_BYTES};
use crate::errors::{NotificationError, Result};

/// Pack one frame.
///
/// The payload must already be validated; the only check here is that its
/// length fits the 16-bit length prefix.
pub fn pack(
    identifier: u32,
    expiry: u32,
    device_token: &[u8; DEVICE_TOKEN_BYTES],
    payload: &[u8],
) -> Result<Bytes> {
    let payload_len = u16::try_from(payload.len()).map_err(|_| NotificationError::PayloadTooLarge {
        size: payload.len(),
        max: usize::from(u16::MAX),
    })?;

    let mut buf = BytesMut::with_capacity(FRAME_HEADER_BYTES + payload.len());
    buf.put_u8(FRAME_COMMAND);
    buf.put_u32(identifier);
    buf.put_u32(expiry);
    buf.put_u16(DEVICE_TOKEN_BYTES as u16);
    buf.put_slice(device_token);
    buf.put_u16(payload_len);
    buf.put_slice(payload);
    Ok(buf.freeze())
}

/// Borrowed view of a packed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Correlation id.
    pub identifier: u32,
    /// Expiry as a UNIX timestamp.
    pub expiry: u32,
    /// Raw device token.
    pub device_token: [u8; DEVICE_TOKEN_BYTES],
    /// Encoded JSON payload.
    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Parse a frame from the front of `buf`.
    ///
    /// Returns `None` if the buffer is short, the command byte is wrong or
    /// the token length is not 32. Bytes after the payload are ignored.
    pub fn parse(buf: &'a [u8]) -> Option<Self> {
        let mut cur = buf;
        if cur.remaining() < FRAME_HEADER_BYTES {
            return None;
        }
        if cur.get_u8() != FRAME_COMMAND {
            return None;
        }
        let identifier = cur.get_u32();
        let expiry = cur.get_u32();
        if usize::from(cur.get_u16()) != DEVICE_TOKEN_BYTES {
            return None;
        }
        let mut device_token = [0u8; DEVICE_TOKEN_BYTES];
        cur.copy_to_slice(&mut device_token);
        let payload_len = usize::from(cur.get_u16());
        let payload = cur.get(..payload_len)?;

        Some(Self {
            identifier,
            expiry,
            device_token,
            payload,
        })
    }

    /// Device token as lowercase hex.
    pub fn device_token_hex(&self) -> String {
        HEXLOWER.encode(&self.device_token)
    }

    /// Payload as UTF-8 text, if it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.payload).ok()
    }

    /// Total number of bytes this frame occupies.
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_BYTES + self.payload.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: [u8; DEVICE_TOKEN_BYTES] = [0xab; DEVICE_TOKEN_BYTES];

    #[test]
    fn packs_header_fields_big_endian() {
        let bytes = pack(0x0102_0304, 0x0a0b_0c0d, &TOKEN, b"{}").unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..5], &[1, 2, 3, 4]);
        assert_eq!(&bytes[5..9], &[0x0a, 0x0b, 0x0c, 0x0d]);
        assert_eq!(&bytes[9..11], &[0x00, 0x20]);
        assert_eq!(&bytes[11..43], &TOKEN);
        assert_eq!(&bytes[43..45], &[0x00, 0x02]);
        assert_eq!(&bytes[45..], b"{}");
    }

    #[test]
    fn frame_length_is_header_plus_payload() {
        let payload = vec![b'x'; 300];
        let bytes = pack(0, 0, &TOKEN, &payload).unwrap();
        assert_eq!(bytes.len(), FRAME_HEADER_BYTES + 300);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![b'x'; usize::from(u16::MAX) + 1];
        assert!(matches!(
            pack(0, 0, &TOKEN, &payload),
            Err(NotificationError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn parse_reads_packed_frame() {
        let bytes = pack(42, 1_700_000_000, &TOKEN, br#"{"aps":{}}"#).unwrap();
        let frame = Frame::parse(&bytes).unwrap();
        assert_eq!(frame.identifier, 42);
        assert_eq!(frame.expiry, 1_700_000_000);
        assert_eq!(frame.device_token, TOKEN);
        assert_eq!(frame.payload_str(), Some(r#"{"aps":{}}"#));
        assert_eq!(frame.device_token_hex(), "ab".repeat(32));
        assert_eq!(frame.encoded_len(), bytes.len());
    }

    #[test]
    fn parse_rejects_short_buffer() {
        let bytes = pack(1, 2, &TOKEN, b"{}").unwrap();
        assert!(Frame::parse(&bytes[..FRAME_HEADER_BYTES - 1]).is_none());
        assert!(Frame::parse(&bytes[..bytes.len() - 1]).is_none());
    }

    #[test]
    fn parse_rejects_wrong_command() {
        let mut bytes = pack(1, 2, &TOKEN, b"{}").unwrap().to_vec();
        bytes[0] = 2;
        assert!(Frame::parse(&bytes).is_none());
    }

    #[test]
    fn parse_ignores_trailing_bytes() {
        let mut bytes = pack(1, 2, &TOKEN, b"{}").unwrap().to_vec();
        bytes.extend_from_slice(&[0xff; 8]);
        let frame = Frame::parse(&bytes).unwrap();
        assert_eq!(frame.payload, b"{}");
    }
}
