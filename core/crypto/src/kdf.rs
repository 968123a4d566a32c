//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Derivation is deterministic for a given (password, salt) pair, which
//! is what lets a later retrieval reproduce the encryption key from the
//! persisted salt.

use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::keys::{MasterKey, Salt, KEY_LENGTH};
use strongroom_common::{Error, Result};

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Parameters for PBKDF2 key derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    /// Number of PBKDF2 iterations.
    pub iterations: u32,
}

impl KdfParams {
    /// Standard parameters for production vaults.
    pub fn standard() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Reduced work factor for test fixtures. Not suitable for real data.
    pub fn fast() -> Self {
        Self { iterations: 1_000 }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// Derive an encryption key from a password and salt.
///
/// # Errors
/// - Returns `InvalidPassword` if the password is empty
/// - Returns error if the iteration count is zero
///
/// # Security
/// - The password is not stored or logged
/// - The derived key zeroizes on drop
pub fn derive_key(password: &[u8], salt: &Salt, params: &KdfParams) -> Result<MasterKey> {
    if password.is_empty() {
        return Err(Error::InvalidPassword(
            "Password cannot be empty".to_string(),
        ));
    }
    if params.iterations == 0 {
        return Err(Error::Crypto(
            "Iteration count must be non-zero".to_string(),
        ));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password, salt.as_bytes(), params.iterations, &mut key_bytes);

    Ok(MasterKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SALT_LENGTH;

    #[test]
    fn test_derive_key_deterministic() {
        let password = b"test-password-123";
        let salt = Salt::from_bytes([42u8; SALT_LENGTH]);
        let params = KdfParams::fast();

        let key1 = derive_key(password, &salt, &params).unwrap();
        let key2 = derive_key(password, &salt, &params).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_salt() {
        let password = b"test-password-123";
        let salt1 = Salt::from_bytes([1u8; SALT_LENGTH]);
        let salt2 = Salt::from_bytes([2u8; SALT_LENGTH]);
        let params = KdfParams::fast();

        let key1 = derive_key(password, &salt1, &params).unwrap();
        let key2 = derive_key(password, &salt2, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_password() {
        let salt = Salt::from_bytes([42u8; SALT_LENGTH]);
        let params = KdfParams::fast();

        let key1 = derive_key(b"password1", &salt, &params).unwrap();
        let key2 = derive_key(b"password2", &salt, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_iterations() {
        let salt = Salt::from_bytes([42u8; SALT_LENGTH]);

        let key1 = derive_key(b"password", &salt, &KdfParams { iterations: 1_000 }).unwrap();
        let key2 = derive_key(b"password", &salt, &KdfParams { iterations: 2_000 }).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_empty_password_fails() {
        let salt = Salt::generate();
        let params = KdfParams::fast();

        let result = derive_key(b"", &salt, &params);
        assert!(matches!(result, Err(Error::InvalidPassword(_))));
    }

    #[test]
    fn test_derive_key_zero_iterations_fails() {
        let salt = Salt::generate();

        let result = derive_key(b"password", &salt, &KdfParams { iterations: 0 });
        assert!(matches!(result, Err(Error::Crypto(_))));
    }

    #[test]
    fn test_standard_params_meet_minimum() {
        assert!(KdfParams::standard().iterations >= 100_000);
        assert_eq!(KdfParams::default().iterations, DEFAULT_ITERATIONS);
    }
}
