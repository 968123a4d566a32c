//! Storage provider trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strongroom_common::{Result, VaultPath};

/// Metadata for a stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Name of the object (last path component).
    pub name: String,
    /// Size in bytes (None for directories).
    pub size: Option<u64>,
    /// Whether this is a directory.
    pub is_directory: bool,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Storage provider trait for different backends.
///
/// Blobs and the metadata document live under a single provider root so
/// that moves between directories stay within one backend.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Get the provider name (e.g., "local", "memory").
    fn name(&self) -> &str;

    /// Write data to the given path, replacing any existing object.
    ///
    /// # Errors
    /// - Parent directory not found
    /// - I/O errors
    async fn upload(&self, path: &VaultPath, data: Vec<u8>) -> Result<Metadata>;

    /// Read the complete content at the given path.
    ///
    /// # Errors
    /// - Object not found
    /// - Path is a directory
    /// - I/O errors
    async fn download(&self, path: &VaultPath) -> Result<Vec<u8>>;

    /// Check if a path exists.
    async fn exists(&self, path: &VaultPath) -> Result<bool>;

    /// List contents of a directory.
    ///
    /// # Errors
    /// - Directory not found
    /// - Path is not a directory
    async fn list(&self, path: &VaultPath) -> Result<Vec<Metadata>>;

    /// Create a directory.
    ///
    /// # Errors
    /// - Already exists
    /// - Parent not found
    async fn create_dir(&self, path: &VaultPath) -> Result<Metadata>;

    /// Move an object to a new path.
    ///
    /// The move is atomic: no observer sees the object at both paths or
    /// at neither. An existing destination is replaced.
    ///
    /// # Errors
    /// - Source not found
    /// - I/O errors
    async fn rename(&self, from: &VaultPath, to: &VaultPath) -> Result<Metadata>;
}
