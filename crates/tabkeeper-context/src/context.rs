//! Context data structure
//!
//! Stored in the local scope under `context_<name>` as
//! `{ "tabs": [{ "url", "pinned", "active", "title" }], "windowId": <id> }`.

use serde::{Deserialize, Serialize};

use tabkeeper_tabs::{Window, WindowId};

pub const CONTEXT_KEY_PREFIX: &str = "context_";

pub fn context_key(name: &str) -> String {
    format!("{}{}", CONTEXT_KEY_PREFIX, name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub url: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// Carried by the storage key, not the record
    #[serde(skip)]
    pub name: String,
    /// Save-time order
    pub tabs: Vec<TabSnapshot>,
    /// Window the snapshot was taken from; informational only
    pub window_id: WindowId,
}

impl Context {
    /// Snapshot a window's tabs in index order
    pub fn from_window(name: String, window: &Window) -> Self {
        let mut tabs = window.tabs.clone();
        tabs.sort_by_key(|t| t.index);

        Self {
            name,
            tabs: tabs
                .into_iter()
                .map(|t| TabSnapshot {
                    url: t.url,
                    pinned: t.pinned,
                    active: t.active,
                    title: t.title,
                })
                .collect(),
            window_id: window.id,
        }
    }

    pub fn key(&self) -> String {
        context_key(&self.name)
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.url.as_str()).collect()
    }
}
