//! Key and salt types with secure memory handling.
//!
//! Key material automatically zeroizes on drop so derived keys do not
//! persist in memory after use.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of derived encryption keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of key-derivation salts in bytes.
pub const SALT_LENGTH: usize = 16;

/// Symmetric key derived from a user password.
///
/// One key exists per stored file, reproducible from the password and
/// the file's persisted salt.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Create a key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKey([REDACTED])")
    }
}

/// Salt for key derivation.
///
/// Persisted twice per stored file: as the envelope prefix and in the
/// metadata record. Serializes as base64 in JSON documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Generate a random salt.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice.
    ///
    /// # Errors
    /// - Returns error if the slice is not exactly SALT_LENGTH bytes
    pub fn from_slice(bytes: &[u8]) -> strongroom_common::Result<Self> {
        let bytes: [u8; SALT_LENGTH] = bytes.try_into().map_err(|_| {
            strongroom_common::Error::Crypto(format!(
                "Invalid salt length: expected {}, got {}",
                SALT_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = STANDARD
            .decode(&encoded)
            .map_err(|e| de::Error::custom(format!("invalid base64 salt: {}", e)))?;
        let bytes: [u8; SALT_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| de::Error::custom(format!("salt must be {} bytes", SALT_LENGTH)))?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_generate_is_random() {
        let salt1 = Salt::generate();
        let salt2 = Salt::generate();

        assert_ne!(salt1.as_bytes(), salt2.as_bytes());
    }

    #[test]
    fn test_salt_from_slice_length_check() {
        assert!(Salt::from_slice(&[0u8; SALT_LENGTH]).is_ok());
        assert!(Salt::from_slice(&[0u8; 15]).is_err());
        assert!(Salt::from_slice(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_salt_serializes_as_base64() {
        let salt = Salt::from_bytes([7u8; SALT_LENGTH]);

        let json = serde_json::to_string(&salt).unwrap();
        assert_eq!(json, format!("\"{}\"", STANDARD.encode([7u8; SALT_LENGTH])));

        let restored: Salt = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, salt);
    }

    #[test]
    fn test_salt_rejects_wrong_length_base64() {
        let short = format!("\"{}\"", STANDARD.encode([1u8; 8]));
        assert!(serde_json::from_str::<Salt>(&short).is_err());
    }

    #[test]
    fn test_master_key_debug_redacted() {
        let key = MasterKey::from_bytes([9u8; KEY_LENGTH]);
        assert_eq!(format!("{:?}", key), "MasterKey([REDACTED])");
    }
}
