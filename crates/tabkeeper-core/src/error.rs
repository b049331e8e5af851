//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] tabkeeper_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] tabkeeper_tabs::TabError),

    #[error("Eviction error: {0}")]
    Eviction(#[from] tabkeeper_eviction::EvictionError),

    #[error("Context error: {0}")]
    Context(#[from] tabkeeper_context::ContextError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Implement std::io::Error conversion for fs operations
impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}
