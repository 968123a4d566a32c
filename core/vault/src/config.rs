//! Vault configuration.

use serde::{Deserialize, Serialize};

use strongroom_common::{Result, VaultPath};
use strongroom_crypto::KdfParams;

/// Default vault area directory name.
pub const VAULT_DIRNAME: &str = "vault";

/// Default recycle area directory name.
pub const RECYCLE_DIRNAME: &str = "recycle";

/// Default metadata document name.
pub const METADATA_FILENAME: &str = "metadata.json";

/// Layout and key-derivation settings for one vault instance.
///
/// Passed to [`crate::VaultManager`] at construction, so multiple
/// isolated vaults can coexist over different roots (one per test, for
/// instance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Directory holding blobs of active files, relative to the
    /// storage root.
    pub vault_dir: String,
    /// Directory holding blobs of soft-deleted files.
    pub recycle_dir: String,
    /// Name of the metadata document at the storage root.
    pub metadata_file: String,
    /// Key derivation parameters applied to every upload.
    pub kdf_params: KdfParams,
}

impl VaultConfig {
    /// Logical path of the vault area.
    pub fn vault_area(&self) -> Result<VaultPath> {
        VaultPath::parse(&self.vault_dir)
    }

    /// Logical path of the recycle area.
    pub fn recycle_area(&self) -> Result<VaultPath> {
        VaultPath::parse(&self.recycle_dir)
    }

    /// Logical path of the metadata document.
    pub fn metadata_path(&self) -> Result<VaultPath> {
        VaultPath::parse(&self.metadata_file)
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            vault_dir: VAULT_DIRNAME.to_string(),
            recycle_dir: RECYCLE_DIRNAME.to_string(),
            metadata_file: METADATA_FILENAME.to_string(),
            kdf_params: KdfParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = VaultConfig::default();

        assert_eq!(config.vault_area().unwrap().to_string_path(), "/vault");
        assert_eq!(config.recycle_area().unwrap().to_string_path(), "/recycle");
        assert_eq!(
            config.metadata_path().unwrap().to_string_path(),
            "/metadata.json"
        );
        assert!(config.kdf_params.iterations >= 100_000);
    }

    #[test]
    fn test_config_serialization() {
        let config = VaultConfig::default();

        let json = serde_json::to_string(&config).unwrap();
        let restored: VaultConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.vault_dir, config.vault_dir);
        assert_eq!(restored.recycle_dir, config.recycle_dir);
        assert_eq!(restored.kdf_params.iterations, config.kdf_params.iterations);
    }
}
