//! Cryptographic primitives for Strongroom.
//!
//! This module provides:
//! - Key derivation using PBKDF2-HMAC-SHA256
//! - Authenticated encryption using XChaCha20-Poly1305
//! - The salt-prefixed envelope format for stored blobs
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Decryption authenticates before returning any plaintext

pub mod aead;
pub mod envelope;
pub mod kdf;
pub mod keys;

pub use aead::{decrypt, encrypt, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_key, KdfParams, DEFAULT_ITERATIONS};
pub use keys::{MasterKey, Salt, KEY_LENGTH, SALT_LENGTH};
