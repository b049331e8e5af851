//! Context error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Context name cannot be empty")]
    EmptyName,

    #[error("Storage error: {0}")]
    Storage(#[from] tabkeeper_storage::StorageError),

    #[error("Tab registry error: {0}")]
    Registry(#[from] tabkeeper_tabs::TabError),

    #[error("Malformed context record: {0}")]
    Json(#[from] serde_json::Error),
}
