//! Vault engine for Strongroom.
//!
//! This module provides:
//! - The vault lifecycle manager (lock, list, retrieve, delete, restore)
//! - Metadata bookkeeping for stored files
//! - Per-instance configuration of the storage layout
//!
//! # Architecture
//! The vault module sits between the surrounding application and the
//! storage backends, composing the crypto crate's envelope format with
//! the metadata document. Callers authenticate users against an
//! external account store before invoking operations here.

pub mod config;
pub mod manager;
pub mod metadata;

pub use config::{VaultConfig, METADATA_FILENAME, RECYCLE_DIRNAME, VAULT_DIRNAME};
pub use manager::VaultManager;
pub use metadata::{MetadataStore, StoredFileRecord, StoredIndex};
