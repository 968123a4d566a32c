//! Common error types for Strongroom.

use thiserror::Error;

/// Top-level error type for vault operations.
///
/// Low-level crypto, storage, and I/O faults are converted into the
/// caller-facing variants (`InvalidPassword`, `NotFound`, `Decryption`,
/// `LockFailure`, `StoreCorrupt`) at the vault manager boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Password is empty or otherwise unusable for key derivation.
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Authenticated decryption failed: wrong key or tampered ciphertext.
    /// The two cases are indistinguishable.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Unknown stored file, or one the caller does not own. Absent and
    /// not-owned are deliberately conflated.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An upload could not be completed; the vault holds no new record.
    #[error("Lock failed: {0}")]
    LockFailure(String),

    /// The metadata document exists but could not be decoded.
    #[error("Metadata store corrupt: {0}")]
    StoreCorrupt(String),

    /// Cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
