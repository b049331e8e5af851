//! TabKeeper Eviction
//!
//! Discards idle tabs to reclaim memory. A tab is evicted only when it is
//! unpinned, in the background, silent, on an http(s) page, and was last
//! accessed strictly before `now - suspension time`.

mod engine;
mod error;
mod policy;

pub use engine::{EvictionEngine, SweepReport, TabFailure};
pub use error::EvictionError;
pub use policy::{EvictionPolicy, Verdict};

pub type Result<T> = std::result::Result<T, EvictionError>;
