//! TabKeeper Contexts
//!
//! A context is a named snapshot of one window's tabs (URL, pin state, active
//! state, title). Saving under an existing name overwrites it. Restoring opens
//! a new window and recreates every http(s) entry in saved order.

mod context;
mod error;
mod manager;

pub use context::{context_key, Context, TabSnapshot, CONTEXT_KEY_PREFIX};
pub use error::ContextError;
pub use manager::{ContextManager, CreateFailure, RestoreOutcome, RestoreReport, SkippedEntry};

pub type Result<T> = std::result::Result<T, ContextError>;
