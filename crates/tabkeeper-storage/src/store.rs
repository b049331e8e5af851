//! Scoped key/value store interface
//!
//! Callers depend on this trait rather than on SQLite so the eviction and
//! context crates can run against `Database::open_in_memory()` in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Device-only, larger capacity
    Local,
    /// Small replicated settings
    Sync,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Sync => "sync",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Scope::Local),
            "sync" => Ok(Scope::Sync),
            _ => Err(format!("Unknown storage scope: {}", s)),
        }
    }
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>>;

    /// Write a value, replacing any previous one. Resolves once the write is durable.
    async fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()>;

    /// Remove a key. Returns whether it existed.
    async fn remove(&self, scope: Scope, key: &str) -> Result<bool>;

    /// All keys in `scope` starting with `prefix`, sorted.
    async fn keys_with_prefix(&self, scope: Scope, prefix: &str) -> Result<Vec<String>>;
}
