//! Durable metadata bookkeeping for stored files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

use strongroom_common::{Error, Result, StoredId, UserId, VaultPath};
use strongroom_crypto::Salt;
use strongroom_storage::StorageProvider;

/// One stored file's bookkeeping entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFileRecord {
    /// User that uploaded the file.
    pub owner_id: UserId,
    /// Name to restore on retrieval.
    pub original_name: String,
    /// Key-derivation salt, duplicated from the envelope prefix.
    pub salt: Salt,
}

/// The full metadata document: stored-file identifier to record.
pub type StoredIndex = BTreeMap<StoredId, StoredFileRecord>;

/// Durable mapping from stored-file identifier to [`StoredFileRecord`].
///
/// The whole document is loaded into memory at each read and rewritten
/// at each write. An internal mutex serializes load-modify-save
/// sequences so concurrent writers cannot lose updates.
pub struct MetadataStore {
    provider: Arc<dyn StorageProvider>,
    path: VaultPath,
    write_lock: Mutex<()>,
}

impl MetadataStore {
    /// Create a store over the given provider and document path.
    pub fn new(provider: Arc<dyn StorageProvider>, path: VaultPath) -> Self {
        Self {
            provider,
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the full document.
    ///
    /// Fails soft: a missing document yields an empty index, and an
    /// unreadable or corrupt one is logged and also yields an empty
    /// index. Callers never observe a load failure.
    pub async fn load(&self) -> StoredIndex {
        match self.read_document().await {
            Ok(index) => index,
            Err(err) => {
                error!(error = %err, path = %self.path, "metadata document unreadable, treating as empty");
                StoredIndex::new()
            }
        }
    }

    async fn read_document(&self) -> Result<StoredIndex> {
        if !self.provider.exists(&self.path).await? {
            return Ok(StoredIndex::new());
        }

        let bytes = self.provider.download(&self.path).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::StoreCorrupt(format!("Failed to decode {}: {}", self.path, e)))
    }

    /// Rewrite the full document.
    ///
    /// # Errors
    /// - Serialization failure
    /// - Storage failure
    pub async fn save(&self, index: &StoredIndex) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(index)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        self.provider.upload(&self.path, bytes).await?;
        Ok(())
    }

    /// Insert or replace one record, persisting the document.
    ///
    /// The load-modify-save sequence runs under the store's write lock.
    pub async fn upsert(&self, id: StoredId, record: StoredFileRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut index = self.load().await;
        index.insert(id, record);
        self.save(&index).await
    }
}
