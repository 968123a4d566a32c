//! Storage backend abstraction for Strongroom.
//!
//! This module provides a trait-based interface over the directory tree
//! that holds the vault area, the recycle area, and the metadata
//! document, with a local-filesystem backend and an in-memory backend
//! for tests.
//!
//! # Design Principles
//! - Backend isolation: no backend-specific logic in vault or crypto
//! - Async operations: all I/O operations are async
//! - Atomic moves: `rename` never leaves an object in both places

pub mod local;
pub mod memory;
pub mod provider;

pub use local::LocalProvider;
pub use memory::MemoryProvider;
pub use provider::{Metadata, StorageProvider};
