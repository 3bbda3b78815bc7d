//! Device token sanitising and hex decoding.

use std::fmt;

use data_encoding::HEXLOWER_PERMISSIVE;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{DEVICE_TOKEN_BYTES, DEVICE_TOKEN_HEX_LEN};
use crate::errors::{NotificationError, Result};

/// Hex device token with all whitespace removed.
///
/// Tokens are commonly copied around in the grouped form
/// `740f4707 bebcf74f ...`; only the hex digits reach the wire.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DeviceToken(String);

impl DeviceToken {
    /// Sanitise a raw token string.
    pub fn new(raw: &str) -> Self {
        Self(raw.chars().filter(|c| !c.is_whitespace()).collect())
    }

    /// The sanitised hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing but whitespace was supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short prefix safe to put in logs.
    pub fn prefix(&self) -> String {
        self.0.chars().take(8).collect()
    }

    /// Decode into the 32 raw bytes carried by the frame.
    pub fn to_bytes(&self) -> Result<[u8; DEVICE_TOKEN_BYTES]> {
        if self.0.is_empty() {
            return Err(NotificationError::MissingDeviceToken);
        }
        if self.0.len() != DEVICE_TOKEN_HEX_LEN {
            return Err(NotificationError::InvalidDeviceToken {
                reason: format!(
                    "expected {DEVICE_TOKEN_HEX_LEN} hex characters, got {}",
                    self.0.len()
                ),
            });
        }
        let decoded = HEXLOWER_PERMISSIVE
            .decode(self.0.as_bytes())
            .map_err(|e| NotificationError::InvalidDeviceToken {
                reason: e.to_string(),
            })?;
        decoded
            .try_into()
            .map_err(|bytes: Vec<u8>| NotificationError::InvalidDeviceToken {
                reason: format!("decoded to {} bytes", bytes.len()),
            })
    }
}

impl fmt::Debug for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeviceToken")
            .field(&format_args!("{}…", self.prefix()))
            .finish()
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceToken {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for DeviceToken {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl Serialize for DeviceToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DeviceToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TOKEN: &str = "740f4707bebcf74f9b7c25d48e3358945f6aa01da5ddb387462c7eaf61bb78ad";

    #[test]
    fn strips_all_whitespace() {
        let token = DeviceToken::new(" 740f4707 bebcf74f 9b7c25d4\t8e335894\n5f6aa01d a5ddb387 462c7eaf 61bb78ad ");
        assert_eq!(token.as_str(), TOKEN);
    }

    #[test]
    fn decodes_to_32_bytes() {
        let bytes = DeviceToken::new(TOKEN).to_bytes().unwrap();
        assert_eq!(bytes.len(), DEVICE_TOKEN_BYTES);
        assert_eq!(bytes[0], 0x74);
        assert_eq!(bytes[31], 0xad);
    }

    #[test]
    fn uppercase_hex_decodes() {
        let upper = DeviceToken::new(&TOKEN.to_uppercase()).to_bytes().unwrap();
        let lower = DeviceToken::new(TOKEN).to_bytes().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn empty_token_is_missing() {
        assert_matches!(
            DeviceToken::new("   ").to_bytes(),
            Err(NotificationError::MissingDeviceToken)
        );
    }

    #[test]
    fn short_token_is_invalid() {
        assert_matches!(
            DeviceToken::new("abcd").to_bytes(),
            Err(NotificationError::InvalidDeviceToken { .. })
        );
    }

    #[test]
    fn non_hex_token_is_invalid() {
        let bad = "zz".repeat(32);
        assert_matches!(
            DeviceToken::new(&bad).to_bytes(),
            Err(NotificationError::InvalidDeviceToken { .. })
        );
    }

    #[test]
    fn debug_hides_full_token() {
        let debug = format!("{:?}", DeviceToken::new(TOKEN));
        assert!(debug.contains("740f4707"));
        assert!(!debug.contains(TOKEN));
    }

    #[test]
    fn deserialize_sanitises() {
        let token: DeviceToken = serde_json::from_str(r#""ab cd""#).unwrap();
        assert_eq!(token.as_str(), "abcd");
    }
}
