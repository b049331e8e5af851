//! Registry interface the core drives

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tab::{Tab, TabId, Window, WindowId};
use crate::Result;

/// Request to open a tab
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTab {
    /// Target window; the current window when `None`
    pub window_id: Option<WindowId>,
    pub url: String,
    /// Explicit position; appended when `None`, clamped to the window length
    pub index: Option<usize>,
    pub pinned: bool,
    pub active: bool,
    /// Placeholder title shown until the page loads
    pub title: Option<String>,
}

impl CreateTab {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            active: true,
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait TabRegistry: Send + Sync {
    /// Every open tab across all windows
    async fn query_tabs(&self) -> Result<Vec<Tab>>;

    /// The window the user is currently working in, populated with its tabs
    async fn current_window(&self) -> Result<Window>;

    /// Unload a tab's content. Discarding an already-discarded tab is a no-op.
    async fn discard_tab(&self, tab_id: TabId) -> Result<Tab>;

    /// Open an empty window
    async fn create_window(&self, focused: bool) -> Result<WindowId>;

    async fn create_tab(&self, request: CreateTab) -> Result<Tab>;
}
