//! In-memory storage provider for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::provider::{Metadata, StorageProvider};
use strongroom_common::{Error, Result, VaultPath};

/// In-memory storage entry.
#[derive(Debug, Clone)]
enum Entry {
    File { data: Vec<u8>, metadata: Metadata },
    Directory { metadata: Metadata },
}

impl Entry {
    fn metadata(&self) -> &Metadata {
        match self {
            Entry::File { metadata, .. } => metadata,
            Entry::Directory { metadata } => metadata,
        }
    }
}

/// In-memory storage provider.
///
/// Useful for testing and development. All data is stored in memory and
/// lost on drop.
pub struct MemoryProvider {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryProvider {
    /// Create a new empty memory provider.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "/".to_string(),
            Entry::Directory {
                metadata: Metadata {
                    name: "/".to_string(),
                    size: None,
                    is_directory: true,
                    modified: Utc::now(),
                },
            },
        );

        Self {
            entries: RwLock::new(entries),
        }
    }

    fn key(path: &VaultPath) -> String {
        path.to_string_path()
    }

    fn parent_key(path: &VaultPath) -> Option<String> {
        path.parent().map(|p| Self::key(&p))
    }

    fn check_parent(&self, path: &VaultPath) -> Result<()> {
        let Some(parent_key) = Self::parent_key(path) else {
            return Err(Error::InvalidInput(
                "Cannot write to the root path".to_string(),
            ));
        };
        match self.entries.read().unwrap().get(&parent_key) {
            Some(Entry::Directory { .. }) => Ok(()),
            Some(Entry::File { .. }) => Err(Error::InvalidInput("Parent is a file".to_string())),
            None => Err(Error::NotFound("Parent directory not found".to_string())),
        }
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn upload(&self, path: &VaultPath, data: Vec<u8>) -> Result<Metadata> {
        self.check_parent(path)?;

        let metadata = Metadata {
            name: path.name().unwrap_or("/").to_string(),
            size: Some(data.len() as u64),
            is_directory: false,
            modified: Utc::now(),
        };

        self.entries.write().unwrap().insert(
            Self::key(path),
            Entry::File {
                data,
                metadata: metadata.clone(),
            },
        );

        Ok(metadata)
    }

    async fn download(&self, path: &VaultPath) -> Result<Vec<u8>> {
        match self.entries.read().unwrap().get(&Self::key(path)) {
            Some(Entry::File { data, .. }) => Ok(data.clone()),
            Some(Entry::Directory { .. }) => {
                Err(Error::InvalidInput("Cannot download directory".to_string()))
            }
            None => Err(Error::NotFound(format!("File not found: {}", path))),
        }
    }

    async fn exists(&self, path: &VaultPath) -> Result<bool> {
        Ok(self.entries.read().unwrap().contains_key(&Self::key(path)))
    }

    async fn list(&self, path: &VaultPath) -> Result<Vec<Metadata>> {
        let entries = self.entries.read().unwrap();

        match entries.get(&Self::key(path)) {
            Some(Entry::Directory { .. }) => {}
            Some(Entry::File { .. }) => {
                return Err(Error::InvalidInput("Not a directory".to_string()));
            }
            None => {
                return Err(Error::NotFound(format!("Directory not found: {}", path)));
            }
        }

        let prefix = if path.is_root() {
            "/".to_string()
        } else {
            format!("{}/", Self::key(path))
        };

        let mut results = Vec::new();
        for (key, entry) in entries.iter() {
            if key == "/" || !key.starts_with(&prefix) {
                continue;
            }
            // Direct children only.
            if key[prefix.len()..].contains('/') {
                continue;
            }
            results.push(entry.metadata().clone());
        }

        Ok(results)
    }

    async fn create_dir(&self, path: &VaultPath) -> Result<Metadata> {
        if self.entries.read().unwrap().contains_key(&Self::key(path)) {
            return Err(Error::AlreadyExists(format!(
                "Path already exists: {}",
                path
            )));
        }
        self.check_parent(path)?;

        let metadata = Metadata {
            name: path.name().unwrap_or("/").to_string(),
            size: None,
            is_directory: true,
            modified: Utc::now(),
        };

        self.entries.write().unwrap().insert(
            Self::key(path),
            Entry::Directory {
                metadata: metadata.clone(),
            },
        );

        Ok(metadata)
    }

    async fn rename(&self, from: &VaultPath, to: &VaultPath) -> Result<Metadata> {
        let mut entries = self.entries.write().unwrap();

        let entry = entries
            .remove(&Self::key(from))
            .ok_or_else(|| Error::NotFound(format!("Source not found: {}", from)))?;

        let entry = match entry {
            Entry::File { data, metadata } => Entry::File {
                data,
                metadata: Metadata {
                    name: to.name().unwrap_or("/").to_string(),
                    modified: Utc::now(),
                    ..metadata
                },
            },
            Entry::Directory { metadata } => Entry::Directory {
                metadata: Metadata {
                    name: to.name().unwrap_or("/").to_string(),
                    modified: Utc::now(),
                    ..metadata
                },
            },
        };

        let metadata = entry.metadata().clone();
        entries.insert(Self::key(to), entry);

        Ok(metadata)
    }
}
