//! Authenticated encryption using XChaCha20-Poly1305.
//!
//! XChaCha20-Poly1305 provides both confidentiality and authenticity,
//! with a 24-byte nonce that is safe for random generation.

use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, AeadCore, KeyInit, OsRng},
    XChaCha20Poly1305,
};

use crate::keys::KEY_LENGTH;
use strongroom_common::{Error, Result};

/// Nonce size for XChaCha20-Poly1305 (24 bytes).
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Encrypt plaintext under a derived key.
///
/// The output is a self-contained token: `nonce || ciphertext || tag`,
/// with the nonce generated randomly per call.
///
/// # Errors
/// - Returns error if the key length is incorrect
/// - Returns error if encryption fails
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    if key.len() != KEY_LENGTH {
        return Err(Error::Crypto(format!(
            "Invalid key length: expected {}, got {}",
            KEY_LENGTH,
            key.len()
        )));
    }

    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key));
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    let mut token = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    token.extend_from_slice(&nonce);
    token.extend_from_slice(&ciphertext);

    Ok(token)
}

/// Decrypt a token produced by [`encrypt`].
///
/// The authentication tag is verified before any plaintext is returned,
/// so a wrong key and a tampered token fail the same way.
///
/// # Errors
/// - Returns error if the key length is incorrect
/// - Returns `Decryption` if the token is too short
/// - Returns `Decryption` if authentication fails
pub fn decrypt(key: &[u8], token: &[u8]) -> Result<Vec<u8>> {
    if key.len() != KEY_LENGTH {
        return Err(Error::Crypto(format!(
            "Invalid key length: expected {}, got {}",
            KEY_LENGTH,
            key.len()
        )));
    }

    if token.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::Decryption("Ciphertext too short".to_string()));
    }

    let (nonce_bytes, ciphertext) = token.split_at(NONCE_SIZE);
    let nonce = GenericArray::from_slice(nonce_bytes);

    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key));

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| Error::Decryption("Wrong key or corrupted ciphertext".to_string()))
}
