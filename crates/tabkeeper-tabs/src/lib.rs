//! TabKeeper Tab Registry
//!
//! Read/query view onto the live set of open tabs and windows. The host
//! browser owns tabs; the core only enumerates, discards and creates them
//! through [`TabRegistry`].

mod error;
mod manager;
mod registry;
mod tab;

pub use error::TabError;
pub use manager::TabManager;
pub use registry::{CreateTab, TabRegistry};
pub use tab::{is_navigable_web, url_host, Tab, TabId, Window, WindowId};

pub type Result<T> = std::result::Result<T, TabError>;
