//! Common utilities and types shared across Strongroom modules.
//!
//! This module provides the error taxonomy and the identifier types that
//! the crypto, storage, and vault crates agree on.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{StoredId, UserId, VaultPath};
