//! Vault lifecycle management.
//!
//! Orchestrates lock, list, retrieve, delete, and restore across the
//! vault and recycle storage areas, enforcing ownership on every access.
//! Callers are expected to have verified account credentials against the
//! external account store before invoking anything here; the password is
//! used for key derivation, not for account identity.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use strongroom_common::{Error, Result, StoredId, UserId, VaultPath};
use strongroom_crypto::envelope;
use strongroom_storage::StorageProvider;

use crate::config::VaultConfig;
use crate::metadata::{MetadataStore, StoredFileRecord};

/// Per-user encrypted file vault.
///
/// Each stored file moves through a two-state lifecycle:
/// locked in the vault area, or soft-deleted in the recycle area.
/// Records are never removed; permanent purge is a future operation.
pub struct VaultManager {
    config: VaultConfig,
    provider: Arc<dyn StorageProvider>,
    store: MetadataStore,
}

impl VaultManager {
    /// Open a vault over the given provider, creating the two storage
    /// areas if they do not exist yet.
    ///
    /// # Errors
    /// - Storage failure while bootstrapping the area directories
    pub async fn open(config: VaultConfig, provider: Arc<dyn StorageProvider>) -> Result<Self> {
        for area in [config.vault_area()?, config.recycle_area()?] {
            if !provider.exists(&area).await? {
                provider.create_dir(&area).await?;
            }
        }

        let store = MetadataStore::new(provider.clone(), config.metadata_path()?);

        Ok(Self {
            config,
            provider,
            store,
        })
    }

    /// Get the vault configuration.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Encrypt and store a file, taking ownership of its content.
    ///
    /// Seals the content under a fresh salt, writes the blob to the
    /// vault area, then records the upload in the metadata document.
    /// A second upload of the same filename by the same user produces
    /// the same identifier and replaces the first record and blob.
    ///
    /// # Errors
    /// - `InvalidPassword` if the password is empty
    /// - `LockFailure` on any crypto, storage, or I/O failure; in that
    ///   case no new record is visible to listings
    pub async fn lock(
        &self,
        user: &UserId,
        password: &str,
        data: &[u8],
        original_name: &str,
    ) -> Result<StoredId> {
        let id = StoredId::for_upload(user, original_name).map_err(as_lock_failure)?;
        debug!(user = %user, stored_id = %id, size = data.len(), "locking file");

        let (blob, salt) = envelope::seal(password.as_bytes(), &self.config.kdf_params, data)
            .map_err(as_lock_failure)?;

        // Blob first, record second: a crash in between leaves an
        // unlisted blob, never a record pointing at nothing.
        let blob_path = self.vault_blob(&id)?;
        self.provider
            .upload(&blob_path, blob)
            .await
            .map_err(as_lock_failure)?;

        let record = StoredFileRecord {
            owner_id: user.clone(),
            original_name: original_name.to_string(),
            salt,
        };
        self.store
            .upsert(id.clone(), record)
            .await
            .map_err(as_lock_failure)?;

        info!(user = %user, stored_id = %id, "file locked");
        Ok(id)
    }

    /// List the user's files currently in the vault area.
    ///
    /// Soft-deleted files are excluded. An empty result is not an
    /// error.
    pub async fn list(&self, user: &UserId) -> Result<Vec<StoredId>> {
        let index = self.store.load().await;
        let recycled = self.recycled_names().await?;

        Ok(index
            .iter()
            .filter(|(id, record)| {
                record.owner_id == *user && !recycled.contains(id.as_str())
            })
            .map(|(id, _)| id.clone())
            .collect())
    }

    /// Decrypt and return a stored file's content.
    ///
    /// # Errors
    /// - `NotFound` if the record is absent, owned by another user, or
    ///   the blob is missing from the vault area; the three cases are
    ///   indistinguishable so callers cannot probe for existence
    /// - `Decryption` on wrong password or tampered blob
    pub async fn retrieve(
        &self,
        id: &StoredId,
        user: &UserId,
        password: &str,
    ) -> Result<Vec<u8>> {
        let record = self.owned_record(id, user).await?;

        let blob = match self.provider.download(&self.vault_blob(id)?).await {
            Ok(blob) => blob,
            Err(Error::NotFound(_)) => {
                warn!(stored_id = %id, "blob missing from vault area");
                return Err(not_found(id));
            }
            Err(other) => return Err(other),
        };

        let data = envelope::open(
            password.as_bytes(),
            &self.config.kdf_params,
            &record.salt,
            &blob,
        )?;

        debug!(stored_id = %id, size = data.len(), "file retrieved");
        Ok(data)
    }

    /// Move a stored file to the recycle area.
    ///
    /// Metadata is unchanged; only the blob location toggles. Returns
    /// `false` when the caller does not own the file or the blob is not
    /// in the vault area.
    ///
    /// # Errors
    /// - `InvalidPassword` if the password is empty
    /// - Storage failure during the move
    pub async fn delete(&self, id: &StoredId, user: &UserId, password: &str) -> Result<bool> {
        require_password(password)?;

        if !self.owns(id, user).await {
            warn!(user = %user, stored_id = %id, "unauthorized delete attempt");
            return Ok(false);
        }

        match self
            .provider
            .rename(&self.vault_blob(id)?, &self.recycle_blob(id)?)
            .await
        {
            Ok(_) => {
                info!(stored_id = %id, "file moved to recycle area");
                Ok(true)
            }
            Err(Error::NotFound(_)) => {
                warn!(stored_id = %id, "blob missing from vault area");
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }

    /// List the user's files currently in the recycle area.
    ///
    /// Determined by intersecting the recycle directory listing with
    /// metadata ownership.
    pub async fn list_recycle_bin(&self, user: &UserId) -> Result<Vec<StoredId>> {
        let index = self.store.load().await;
        let recycled = self.recycled_names().await?;

        Ok(index
            .iter()
            .filter(|(id, record)| {
                record.owner_id == *user && recycled.contains(id.as_str())
            })
            .map(|(id, _)| id.clone())
            .collect())
    }

    /// Move a stored file from the recycle area back to the vault area.
    ///
    /// Inverse of [`VaultManager::delete`]. Returns `false` when the
    /// caller does not own the file or the blob is not in the recycle
    /// area.
    ///
    /// # Errors
    /// - `InvalidPassword` if the password is empty
    /// - Storage failure during the move
    pub async fn restore(&self, id: &StoredId, user: &UserId, password: &str) -> Result<bool> {
        require_password(password)?;

        if !self.owns(id, user).await {
            warn!(user = %user, stored_id = %id, "unauthorized restore attempt");
            return Ok(false);
        }

        match self
            .provider
            .rename(&self.recycle_blob(id)?, &self.vault_blob(id)?)
            .await
        {
            Ok(_) => {
                info!(stored_id = %id, "file restored from recycle area");
                Ok(true)
            }
            Err(Error::NotFound(_)) => {
                warn!(stored_id = %id, "blob missing from recycle area");
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }

    /// Look up a record the caller owns.
    async fn owned_record(&self, id: &StoredId, user: &UserId) -> Result<StoredFileRecord> {
        let index = self.store.load().await;
        match index.get(id) {
            Some(record) if record.owner_id == *user => Ok(record.clone()),
            _ => Err(not_found(id)),
        }
    }

    async fn owns(&self, id: &StoredId, user: &UserId) -> bool {
        self.owned_record(id, user).await.is_ok()
    }

    /// Names of blobs currently in the recycle area.
    async fn recycled_names(&self) -> Result<HashSet<String>> {
        let listing = self.provider.list(&self.config.recycle_area()?).await?;
        Ok(listing
            .into_iter()
            .filter(|m| !m.is_directory)
            .map(|m| m.name)
            .collect())
    }

    fn vault_blob(&self, id: &StoredId) -> Result<VaultPath> {
        self.config.vault_area()?.join(id.as_str())
    }

    fn recycle_blob(&self, id: &StoredId) -> Result<VaultPath> {
        self.config.recycle_area()?.join(id.as_str())
    }
}

fn not_found(id: &StoredId) -> Error {
    Error::NotFound(format!("No stored file {}", id))
}

/// Convert any failure during lock into `LockFailure`, keeping
/// `InvalidPassword` distinct.
fn as_lock_failure(err: Error) -> Error {
    match err {
        Error::InvalidPassword(_) => err,
        other => Error::LockFailure(other.to_string()),
    }
}

fn require_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::InvalidPassword(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongroom_crypto::KdfParams;
    use strongroom_storage::{LocalProvider, MemoryProvider};

    fn test_config() -> VaultConfig {
        VaultConfig {
            kdf_params: KdfParams::fast(),
            ..VaultConfig::default()
        }
    }

    async fn open_test_vault() -> VaultManager {
        VaultManager::open(test_config(), Arc::new(MemoryProvider::new()))
            .await
            .unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_lock_list_retrieve_scenario() {
        let vault = open_test_vault().await;
        let alice = user("alice");
        let content = vec![0x5Au8; 500];

        let id = vault
            .lock(&alice, "P1", &content, "report.pdf")
            .await
            .unwrap();
        assert_eq!(id.as_str(), "alice_report.pdf.enc");

        assert_eq!(vault.list(&alice).await.unwrap(), vec![id.clone()]);

        let retrieved = vault.retrieve(&id, &alice, "P1").await.unwrap();
        assert_eq!(retrieved, content);
    }

    #[tokio::test]
    async fn test_retrieve_wrong_password_fails() {
        let vault = open_test_vault().await;
        let alice = user("alice");

        let id = vault
            .lock(&alice, "P1", b"secret", "report.pdf")
            .await
            .unwrap();

        let result = vault.retrieve(&id, &alice, "wrong").await;
        assert!(matches!(result, Err(Error::Decryption(_))));
    }

    #[tokio::test]
    async fn test_lock_empty_password_fails() {
        let vault = open_test_vault().await;

        let result = vault.lock(&user("alice"), "", b"data", "a.txt").await;
        assert!(matches!(result, Err(Error::InvalidPassword(_))));
    }

    #[tokio::test]
    async fn test_lock_invalid_filename_fails() {
        let vault = open_test_vault().await;

        let result = vault
            .lock(&user("alice"), "P1", b"data", "../escape")
            .await;
        assert!(matches!(result, Err(Error::LockFailure(_))));
    }

    #[tokio::test]
    async fn test_retrieve_unknown_id_is_not_found() {
        let vault = open_test_vault().await;
        let id = StoredId::new("alice_nothing.enc").unwrap();

        let result = vault.retrieve(&id, &user("alice"), "P1").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ownership_isolation() {
        let vault = open_test_vault().await;
        let alice = user("alice");
        let bob = user("bob");

        let id = vault
            .lock(&alice, "P1", b"alice's data", "report.pdf")
            .await
            .unwrap();

        // Even with the correct password, bob sees nothing.
        let result = vault.retrieve(&id, &bob, "P1").await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        assert!(!vault.delete(&id, &bob, "P1").await.unwrap());
        assert!(!vault.restore(&id, &bob, "P1").await.unwrap());
        assert!(vault.list(&bob).await.unwrap().is_empty());
        assert!(vault.list_recycle_bin(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_per_user() {
        let vault = open_test_vault().await;
        let alice = user("alice");
        let bob = user("bob");

        let alice_id = vault.lock(&alice, "P1", b"a", "a.txt").await.unwrap();
        let bob_id = vault.lock(&bob, "P2", b"b", "b.txt").await.unwrap();

        assert_eq!(vault.list(&alice).await.unwrap(), vec![alice_id]);
        assert_eq!(vault.list(&bob).await.unwrap(), vec![bob_id]);
    }

    #[tokio::test]
    async fn test_delete_restore_cycle() {
        let vault = open_test_vault().await;
        let alice = user("alice");
        let content = b"cycle me".to_vec();

        let id = vault
            .lock(&alice, "P1", &content, "report.pdf")
            .await
            .unwrap();

        assert!(vault.delete(&id, &alice, "P1").await.unwrap());
        assert!(vault.list(&alice).await.unwrap().is_empty());
        assert_eq!(
            vault.list_recycle_bin(&alice).await.unwrap(),
            vec![id.clone()]
        );

        // Recycled files cannot be retrieved from the vault area.
        let result = vault.retrieve(&id, &alice, "P1").await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        assert!(vault.restore(&id, &alice, "P1").await.unwrap());
        assert_eq!(vault.list(&alice).await.unwrap(), vec![id.clone()]);
        assert!(vault.list_recycle_bin(&alice).await.unwrap().is_empty());

        // Metadata survived the round trip: content still decrypts.
        assert_eq!(vault.retrieve(&id, &alice, "P1").await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_delete_twice_returns_false() {
        let vault = open_test_vault().await;
        let alice = user("alice");

        let id = vault.lock(&alice, "P1", b"x", "a.txt").await.unwrap();

        assert!(vault.delete(&id, &alice, "P1").await.unwrap());
        assert!(!vault.delete(&id, &alice, "P1").await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_without_delete_returns_false() {
        let vault = open_test_vault().await;
        let alice = user("alice");

        let id = vault.lock(&alice, "P1", b"x", "a.txt").await.unwrap();

        assert!(!vault.restore(&id, &alice, "P1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_empty_password_fails() {
        let vault = open_test_vault().await;
        let alice = user("alice");

        let id = vault.lock(&alice, "P1", b"x", "a.txt").await.unwrap();

        let result = vault.delete(&id, &alice, "").await;
        assert!(matches!(result, Err(Error::InvalidPassword(_))));
    }

    #[tokio::test]
    async fn test_relock_same_filename_overwrites() {
        let vault = open_test_vault().await;
        let alice = user("alice");

        let first = vault
            .lock(&alice, "P1", b"version one", "report.pdf")
            .await
            .unwrap();
        let second = vault
            .lock(&alice, "P2", b"version two", "report.pdf")
            .await
            .unwrap();

        // Same identifier, one listing entry.
        assert_eq!(first, second);
        assert_eq!(vault.list(&alice).await.unwrap(), vec![second.clone()]);

        // The second upload's password and content won.
        assert_eq!(
            vault.retrieve(&second, &alice, "P2").await.unwrap(),
            b"version two"
        );
        let result = vault.retrieve(&second, &alice, "P1").await;
        assert!(matches!(result, Err(Error::Decryption(_))));
    }

    #[tokio::test]
    async fn test_listings_are_disjoint_and_complete() {
        let vault = open_test_vault().await;
        let alice = user("alice");

        let kept = vault.lock(&alice, "P1", b"keep", "keep.txt").await.unwrap();
        let trashed = vault
            .lock(&alice, "P1", b"trash", "trash.txt")
            .await
            .unwrap();
        assert!(vault.delete(&trashed, &alice, "P1").await.unwrap());

        let active = vault.list(&alice).await.unwrap();
        let recycled = vault.list_recycle_bin(&alice).await.unwrap();

        assert_eq!(active, vec![kept]);
        assert_eq!(recycled, vec![trashed]);
        assert!(active.iter().all(|id| !recycled.contains(id)));

        let mut union: Vec<StoredId> = active.into_iter().chain(recycled).collect();
        union.sort();
        assert_eq!(union.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_metadata_degrades_to_empty() {
        let provider = Arc::new(MemoryProvider::new());
        let config = test_config();
        let vault = VaultManager::open(config.clone(), provider.clone())
            .await
            .unwrap();
        let alice = user("alice");

        vault.lock(&alice, "P1", b"x", "a.txt").await.unwrap();

        provider
            .upload(&config.metadata_path().unwrap(), b"][ corrupt".to_vec())
            .await
            .unwrap();

        // Listing degrades to empty instead of failing.
        assert!(vault.list(&alice).await.unwrap().is_empty());

        // The store recovers on the next write.
        let id = vault.lock(&alice, "P1", b"y", "b.txt").await.unwrap();
        assert_eq!(vault.list(&alice).await.unwrap(), vec![id]);
    }

    #[tokio::test]
    async fn test_end_to_end_on_local_filesystem() {
        let temp = tempfile::TempDir::new().unwrap();
        let provider = Arc::new(LocalProvider::new(temp.path()).unwrap());
        let vault = VaultManager::open(test_config(), provider).await.unwrap();
        let alice = user("alice");
        let content = b"on disk".to_vec();

        let id = vault
            .lock(&alice, "P1", &content, "report.pdf")
            .await
            .unwrap();

        // Blob sits in the vault directory under the opaque name.
        assert!(temp.path().join("vault/alice_report.pdf.enc").exists());
        assert!(temp.path().join("metadata.json").exists());

        assert!(vault.delete(&id, &alice, "P1").await.unwrap());
        assert!(temp.path().join("recycle/alice_report.pdf.enc").exists());
        assert!(!temp.path().join("vault/alice_report.pdf.enc").exists());

        assert!(vault.restore(&id, &alice, "P1").await.unwrap());
        assert_eq!(vault.retrieve(&id, &alice, "P1").await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_reopen_existing_vault() {
        let temp = tempfile::TempDir::new().unwrap();
        let alice = user("alice");

        let id = {
            let provider = Arc::new(LocalProvider::new(temp.path()).unwrap());
            let vault = VaultManager::open(test_config(), provider).await.unwrap();
            vault.lock(&alice, "P1", b"persisted", "a.txt").await.unwrap()
        };

        let provider = Arc::new(LocalProvider::new(temp.path()).unwrap());
        let vault = VaultManager::open(test_config(), provider).await.unwrap();

        assert_eq!(vault.list(&alice).await.unwrap(), vec![id.clone()]);
        assert_eq!(
            vault.retrieve(&id, &alice, "P1").await.unwrap(),
            b"persisted"
        );
    }
}
