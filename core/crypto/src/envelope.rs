//! Salt-prefixed envelope format for stored blobs.
//!
//! A stored blob is `salt (16 bytes) || token`, where the token is the
//! self-contained AEAD output of [`crate::aead::encrypt`]. The salt is
//! duplicated in the metadata record; both copies must agree, and a
//! mismatch is treated as tampering.

use crate::aead::{decrypt, encrypt, NONCE_SIZE, TAG_SIZE};
use crate::kdf::{derive_key, KdfParams};
use crate::keys::{Salt, SALT_LENGTH};
use strongroom_common::{Error, Result};

/// Minimum length of a well-formed envelope.
pub const MIN_ENVELOPE_SIZE: usize = SALT_LENGTH + NONCE_SIZE + TAG_SIZE;

/// Seal plaintext into an envelope under a fresh salt.
///
/// Derives a key from the password, encrypts, and prefixes the salt.
/// The returned salt is the one embedded in the blob, for the caller to
/// persist in its metadata record.
///
/// # Errors
/// - Returns `InvalidPassword` if the password is empty
/// - Returns error on key derivation or encryption failure
pub fn seal(password: &[u8], params: &KdfParams, plaintext: &[u8]) -> Result<(Vec<u8>, Salt)> {
    let salt = Salt::generate();
    let key = derive_key(password, &salt, params)?;
    let token = encrypt(key.as_bytes(), plaintext)?;

    let mut blob = Vec::with_capacity(SALT_LENGTH + token.len());
    blob.extend_from_slice(salt.as_bytes());
    blob.extend_from_slice(&token);

    Ok((blob, salt))
}

/// Open an envelope, checking its salt against the metadata copy.
///
/// # Errors
/// - Returns `Decryption` if the blob is too short
/// - Returns `Decryption` if the embedded salt disagrees with
///   `expected_salt`
/// - Returns `Decryption` on wrong password or tampered token
/// - Returns `InvalidPassword` if the password is empty
pub fn open(
    password: &[u8],
    params: &KdfParams,
    expected_salt: &Salt,
    blob: &[u8],
) -> Result<Vec<u8>> {
    if blob.len() < MIN_ENVELOPE_SIZE {
        return Err(Error::Decryption("Envelope too short".to_string()));
    }

    let (prefix, token) = blob.split_at(SALT_LENGTH);
    if prefix != expected_salt.as_bytes() {
        return Err(Error::Decryption(
            "Envelope salt does not match metadata".to_string(),
        ));
    }

    let key = derive_key(password, expected_salt, params)?;
    decrypt(key.as_bytes(), token)
}
