//! TabKeeper Core
//!
//! Owns the process-wide lifecycle: the store and registry handles, the
//! eviction and context managers, the recurring sweep, and the typed command
//! surface hosts call into.

mod command;
mod config;
mod error;
mod keeper;
mod scheduler;
mod suggest;

pub use command::{Command, CommandResponse, TabStats};
pub use config::Config;
pub use error::CoreError;
pub use keeper::TabKeeper;
pub use scheduler::SweepScheduler;
pub use suggest::{SuggestionRule, TabSuggester};

// Re-export core components
pub use tabkeeper_context::{
    Context, ContextError, ContextManager, RestoreOutcome, RestoreReport, TabSnapshot,
};
pub use tabkeeper_eviction::{EvictionEngine, EvictionError, EvictionPolicy, SweepReport};
pub use tabkeeper_storage::{Database, KeyValueStore, Scope, Settings, StorageError};
pub use tabkeeper_tabs::{CreateTab, Tab, TabError, TabId, TabManager, TabRegistry, Window, WindowId};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
