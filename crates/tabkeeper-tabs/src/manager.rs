//! In-memory tab registry
//!
//! Tracks windows and tabs the way a host browser reports them. Hosts push
//! events in (`activate_tab`, `set_audible`, `close_tab`, ...) and the core
//! reads and mutates through [`TabRegistry`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::TabError;
use crate::registry::{CreateTab, TabRegistry};
use crate::tab::{Tab, TabId, Window, WindowId};
use crate::Result;

#[derive(Debug, Default)]
struct RegistryState {
    windows: BTreeMap<WindowId, Window>,
    current_window: Option<WindowId>,
    next_tab_id: u64,
    next_window_id: u64,
}

impl RegistryState {
    fn window_mut(&mut self, window_id: WindowId) -> Result<&mut Window> {
        self.windows
            .get_mut(&window_id)
            .ok_or(TabError::WindowNotFound(window_id))
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Result<&mut Tab> {
        self.windows
            .values_mut()
            .flat_map(|w| w.tabs.iter_mut())
            .find(|t| t.id == tab_id)
            .ok_or(TabError::NotFound(tab_id))
    }

    fn locate(&self, tab_id: TabId) -> Result<(WindowId, usize)> {
        self.windows
            .values()
            .find_map(|w| {
                w.tabs
                    .iter()
                    .position(|t| t.id == tab_id)
                    .map(|pos| (w.id, pos))
            })
            .ok_or(TabError::NotFound(tab_id))
    }

    fn open_window(&mut self, focused: bool) -> WindowId {
        self.next_window_id += 1;
        let id = WindowId(self.next_window_id);

        if focused {
            for window in self.windows.values_mut() {
                window.focused = false;
            }
            self.current_window = Some(id);
        } else if self.current_window.is_none() {
            self.current_window = Some(id);
        }

        self.windows.insert(
            id,
            Window {
                id,
                focused,
                tabs: Vec::new(),
            },
        );
        id
    }
}

fn reindex(window: &mut Window) {
    for (index, tab) in window.tabs.iter_mut().enumerate() {
        tab.index = index;
        tab.window_id = window.id;
    }
}

fn set_active(window: &mut Window, tab_id: TabId, now: DateTime<Utc>) {
    for tab in window.tabs.iter_mut() {
        if tab.id == tab_id {
            tab.active = true;
            tab.discarded = false;
            tab.last_accessed = now;
        } else {
            tab.active = false;
        }
    }
}

pub struct TabManager {
    state: Arc<RwLock<RegistryState>>,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
        }
    }

    /// Open a new window and make it current
    pub fn open_window(&self) -> WindowId {
        let id = self.state.write().open_window(true);
        tracing::debug!(window_id = %id, "Opened window");
        id
    }

    /// Open a tab, stamping `last_accessed` with the current time
    pub fn open_tab(&self, request: CreateTab) -> Result<Tab> {
        self.open_tab_at(request, Utc::now())
    }

    /// Open a tab with an explicit last-accessed time
    pub fn open_tab_at(&self, request: CreateTab, accessed_at: DateTime<Utc>) -> Result<Tab> {
        if request.url.trim().is_empty() {
            return Err(TabError::InvalidUrl("URL cannot be empty".to_string()));
        }

        let mut state = self.state.write();
        let window_id = match request.window_id {
            Some(id) => id,
            None => state.current_window.ok_or(TabError::NoCurrentWindow)?,
        };

        state.next_tab_id += 1;
        let tab_id = TabId(state.next_tab_id);

        let window = state.window_mut(window_id)?;
        let index = request
            .index
            .unwrap_or(window.tabs.len())
            .min(window.tabs.len());

        window.tabs.insert(
            index,
            Tab {
                id: tab_id,
                window_id,
                index,
                url: request.url,
                title: request.title.unwrap_or_default(),
                pinned: request.pinned,
                active: false,
                audible: false,
                discarded: false,
                last_accessed: accessed_at,
            },
        );

        // A window always has one active tab
        if request.active || window.active_tab().is_none() {
            set_active(window, tab_id, accessed_at);
        }
        reindex(window);

        let tab = window.tabs[index].clone();
        tracing::debug!(tab_id = %tab.id, window_id = %window_id, index, url = %tab.url, "Created tab");
        Ok(tab)
    }

    /// Get a tab by ID
    pub fn get_tab(&self, tab_id: TabId) -> Result<Tab> {
        let state = self.state.read();
        let (window_id, pos) = state.locate(tab_id)?;
        Ok(state.windows[&window_id].tabs[pos].clone())
    }

    pub fn get_window(&self, window_id: WindowId) -> Result<Window> {
        self.state
            .read()
            .windows
            .get(&window_id)
            .cloned()
            .ok_or(TabError::WindowNotFound(window_id))
    }

    pub fn windows(&self) -> Vec<Window> {
        self.state.read().windows.values().cloned().collect()
    }

    /// Activate a tab (user focused it); reloads it if discarded
    pub fn activate_tab(&self, tab_id: TabId) -> Result<Tab> {
        let mut state = self.state.write();
        let (window_id, pos) = state.locate(tab_id)?;
        let window = state.window_mut(window_id)?;
        set_active(window, tab_id, Utc::now());
        Ok(window.tabs[pos].clone())
    }

    pub fn set_audible(&self, tab_id: TabId, audible: bool) -> Result<Tab> {
        let mut state = self.state.write();
        let tab = state.tab_mut(tab_id)?;
        tab.audible = audible;
        Ok(tab.clone())
    }

    pub fn set_pinned(&self, tab_id: TabId, pinned: bool) -> Result<Tab> {
        let mut state = self.state.write();
        let tab = state.tab_mut(tab_id)?;
        tab.pinned = pinned;
        Ok(tab.clone())
    }

    pub fn set_title(&self, tab_id: TabId, title: String) -> Result<Tab> {
        let mut state = self.state.write();
        let tab = state.tab_mut(tab_id)?;
        tab.title = title;
        Ok(tab.clone())
    }

    pub fn set_last_accessed(&self, tab_id: TabId, at: DateTime<Utc>) -> Result<Tab> {
        let mut state = self.state.write();
        let tab = state.tab_mut(tab_id)?;
        tab.last_accessed = at;
        Ok(tab.clone())
    }

    /// Close a tab; the neighbour to its left (or right) becomes active if it was active
    pub fn close_tab(&self, tab_id: TabId) -> Result<()> {
        let mut state = self.state.write();
        let (window_id, pos) = state.locate(tab_id)?;
        let window = state.window_mut(window_id)?;
        let removed = window.tabs.remove(pos);

        if removed.active && !window.tabs.is_empty() {
            let next = window.tabs[pos.saturating_sub(1).min(window.tabs.len() - 1)].id;
            set_active(window, next, Utc::now());
        }
        reindex(window);

        tracing::debug!(tab_id = %tab_id, "Closed tab");
        Ok(())
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TabManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[async_trait]
impl TabRegistry for TabManager {
    async fn query_tabs(&self) -> Result<Vec<Tab>> {
        Ok(self
            .state
            .read()
            .windows
            .values()
            .flat_map(|w| w.tabs.iter().cloned())
            .collect())
    }

    async fn current_window(&self) -> Result<Window> {
        let state = self.state.read();
        let id = state.current_window.ok_or(TabError::NoCurrentWindow)?;
        state
            .windows
            .get(&id)
            .cloned()
            .ok_or(TabError::WindowNotFound(id))
    }

    async fn discard_tab(&self, tab_id: TabId) -> Result<Tab> {
        let mut state = self.state.write();
        let tab = state.tab_mut(tab_id)?;

        if tab.discarded {
            return Ok(tab.clone());
        }
        if tab.active {
            return Err(TabError::DiscardActive(tab_id));
        }

        tab.discarded = true;
        Ok(tab.clone())
    }

    async fn create_window(&self, focused: bool) -> Result<WindowId> {
        let id = self.state.write().open_window(focused);
        tracing::debug!(window_id = %id, focused, "Created window");
        Ok(id)
    }

    async fn create_tab(&self, request: CreateTab) -> Result<Tab> {
        self.open_tab(request)
    }
}
