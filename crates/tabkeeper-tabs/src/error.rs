//! Tab error types

use thiserror::Error;

use crate::tab::{TabId, WindowId};

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(TabId),

    #[error("Window not found: {0}")]
    WindowNotFound(WindowId),

    #[error("No current window")]
    NoCurrentWindow,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Cannot discard tab {0}: it is active")]
    DiscardActive(TabId),
}
