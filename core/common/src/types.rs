//! Common types used throughout Strongroom.

use serde::{Deserialize, Serialize};
use std::fmt;

fn reject_separators(value: &str, what: &str) -> crate::Result<()> {
    if value.contains('/') || value.contains('\\') {
        return Err(crate::Error::InvalidInput(format!(
            "{} cannot contain path separators",
            what
        )));
    }
    Ok(())
}

/// Identifier of a vault user.
///
/// Account identity is managed by an external account store; the vault
/// only uses this value for ownership checks and stored-file naming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId from a string.
    ///
    /// # Errors
    /// - Returns error if the id is empty or contains path separators
    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(crate::Error::InvalidInput(
                "UserId cannot be empty".to_string(),
            ));
        }
        reject_separators(&id, "UserId")?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a stored file.
///
/// Doubles as the blob name in both storage areas and as the key in the
/// metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoredId(String);

impl StoredId {
    /// Derive the identifier for an upload: `{user}_{original_name}.enc`.
    ///
    /// Deterministic, so a second upload of the same filename by the
    /// same user produces the same identifier and overwrites the first.
    ///
    /// # Errors
    /// - Returns error if the original name is empty or contains path
    ///   separators
    pub fn for_upload(owner: &UserId, original_name: &str) -> crate::Result<Self> {
        if original_name.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Original filename cannot be empty".to_string(),
            ));
        }
        reject_separators(original_name, "Original filename")?;
        Ok(Self(format!("{}_{}.enc", owner.as_str(), original_name)))
    }

    /// Wrap an identifier received from a caller (e.g. a listing result).
    ///
    /// # Errors
    /// - Returns error if the id is empty or contains path separators
    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(crate::Error::InvalidInput(
                "StoredId cannot be empty".to_string(),
            ));
        }
        reject_separators(&id, "StoredId")?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logical path within a storage root, independent of the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultPath {
    components: Vec<String>,
}

impl VaultPath {
    /// Create a root path.
    pub fn root() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Parse a '/'-separated path string.
    ///
    /// # Errors
    /// - Returns error if any component is empty or contains separators
    pub fn parse(path: &str) -> crate::Result<Self> {
        let trimmed = path.trim_start_matches('/').trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut components = Vec::new();
        for component in trimmed.split('/') {
            if component.is_empty() {
                return Err(crate::Error::InvalidInput(
                    "Path component cannot be empty".to_string(),
                ));
            }
            reject_separators(component, "Path component")?;
            components.push(component.to_string());
        }
        Ok(Self { components })
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the parent path, if any.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let mut components = self.components.clone();
        components.pop();
        Some(Self { components })
    }

    /// Get the file/directory name (last component).
    pub fn name(&self) -> Option<&str> {
        self.components.last().map(|s| s.as_str())
    }

    /// Join this path with a child component.
    ///
    /// # Errors
    /// - Returns error if the child is empty or contains separators
    pub fn join(&self, child: &str) -> crate::Result<Self> {
        if child.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Child component cannot be empty".to_string(),
            ));
        }
        reject_separators(child, "Child component")?;
        let mut components = self.components.clone();
        components.push(child.to_string());
        Ok(Self { components })
    }

    /// Get the path components.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Convert to a string representation.
    pub fn to_string_path(&self) -> String {
        if self.is_root() {
            "/".to_string()
        } else {
            format!("/{}", self.components.join("/"))
        }
    }
}

impl fmt::Display for VaultPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_path())
    }
}
