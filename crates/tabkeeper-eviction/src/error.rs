//! Eviction error types

use thiserror::Error;

/// Whole-sweep failures. Per-tab discard failures never surface here.
#[derive(Error, Debug)]
pub enum EvictionError {
    #[error("Storage error: {0}")]
    Storage(#[from] tabkeeper_storage::StorageError),

    #[error("Tab registry error: {0}")]
    Registry(#[from] tabkeeper_tabs::TabError),
}
