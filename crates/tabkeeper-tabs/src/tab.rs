//! Tab and window data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Opaque identifier assigned by the registry
    pub id: TabId,
    /// Window this tab belongs to
    pub window_id: WindowId,
    /// Position within its window
    pub index: usize,
    /// Current URL; may be an internal browser page
    pub url: String,
    pub title: String,
    pub pinned: bool,
    /// Foregrounded tab of its window
    pub active: bool,
    /// Currently producing sound
    pub audible: bool,
    /// Content unloaded; reloads lazily on next activation
    pub discarded: bool,
    pub last_accessed: DateTime<Utc>,
}

impl Tab {
    pub fn is_navigable_web(&self) -> bool {
        is_navigable_web(&self.url)
    }

    /// Host of the tab's URL, if it parses
    pub fn host(&self) -> Option<String> {
        url_host(&self.url)
    }

    /// Get display title (with fallback to URL)
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub id: WindowId,
    pub focused: bool,
    /// Tabs in index order
    pub tabs: Vec<Tab>,
}

impl Window {
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.active)
    }
}

/// True for http and https URLs. Internal pages (`chrome://`, `about:`),
/// extension pages and anything unparseable are not navigable-web.
pub fn is_navigable_web(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Host component of `raw`, if it parses as a URL with a host
pub fn url_host(raw: &str) -> Option<String> {
    url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
