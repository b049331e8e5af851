//! Context Manager
//!
//! Saves the current window under a name and rebuilds it later. Records live
//! only in the store; every call re-reads them.

use serde::Serialize;
use std::sync::Arc;

use tabkeeper_storage::{KeyValueStore, Scope};
use tabkeeper_tabs::{is_navigable_web, CreateTab, TabId, TabRegistry, WindowId};

use crate::context::{context_key, Context, CONTEXT_KEY_PREFIX};
use crate::error::ContextError;
use crate::Result;

/// Snapshot entry that cannot be recreated (non-http(s) URL)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEntry {
    /// Position in the saved sequence
    pub position: usize,
    pub url: String,
}

/// Tab creation the registry refused
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFailure {
    pub position: usize,
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
    pub window_id: WindowId,
    /// Created tabs, in saved order
    pub created: Vec<TabId>,
    pub skipped: Vec<SkippedEntry>,
    pub failures: Vec<CreateFailure>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RestoreOutcome {
    /// No context stored under that name; nothing was opened
    NotFound,
    Restored(RestoreReport),
}

impl RestoreOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, RestoreOutcome::Restored(_))
    }
}

pub struct ContextManager {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<dyn TabRegistry>,
}

impl ContextManager {
    pub fn new(store: Arc<dyn KeyValueStore>, registry: Arc<dyn TabRegistry>) -> Self {
        Self { store, registry }
    }

    /// Snapshot the current window under `name`, replacing any previous snapshot.
    ///
    /// Resolves only after the store confirms the write.
    pub async fn save_context(&self, name: &str) -> Result<Context> {
        let name = normalize_name(name)?;
        let window = self.registry.current_window().await?;
        let context = Context::from_window(name, &window);

        let record = serde_json::to_value(&context)?;
        self.store.set(Scope::Local, &context.key(), record).await?;

        tracing::info!(
            context = %context.name,
            window_id = %context.window_id,
            tab_count = context.tab_count(),
            "Saved context"
        );

        Ok(context)
    }

    /// A blank name names no context.
    pub async fn load_context(&self, name: &str) -> Result<Option<Context>> {
        let Some(name) = lookup_name(name) else {
            return Ok(None);
        };
        match self.store.get(Scope::Local, &context_key(&name)).await? {
            Some(record) => {
                let mut context: Context = serde_json::from_value(record)?;
                context.name = name;
                Ok(Some(context))
            }
            None => Ok(None),
        }
    }

    /// Open a new window populated from the named snapshot.
    ///
    /// Entries are created one at a time with explicit, dense position
    /// indices so the final order matches the snapshot. Non-web entries are
    /// skipped and failed creations are recorded; neither stops the restore.
    pub async fn restore_context(&self, name: &str) -> Result<RestoreOutcome> {
        let Some(context) = self.load_context(name).await? else {
            tracing::info!(context = %name.trim(), "No context found");
            return Ok(RestoreOutcome::NotFound);
        };

        let window_id = self.registry.create_window(true).await?;
        let mut report = RestoreReport {
            window_id,
            created: Vec::with_capacity(context.tabs.len()),
            skipped: Vec::new(),
            failures: Vec::new(),
        };

        for (position, snapshot) in context.tabs.iter().enumerate() {
            if !is_navigable_web(&snapshot.url) {
                tracing::warn!(
                    context = %context.name,
                    position,
                    url = %snapshot.url,
                    "Skipping non-http(s) entry"
                );
                report.skipped.push(SkippedEntry {
                    position,
                    url: snapshot.url.clone(),
                });
                continue;
            }

            let request = CreateTab {
                window_id: Some(window_id),
                url: snapshot.url.clone(),
                index: Some(report.created.len()),
                pinned: snapshot.pinned,
                active: snapshot.active,
                title: Some(snapshot.title.clone()).filter(|t| !t.is_empty()),
            };

            match self.registry.create_tab(request).await {
                Ok(tab) => report.created.push(tab.id),
                Err(e) => {
                    tracing::warn!(
                        context = %context.name,
                        position,
                        url = %snapshot.url,
                        error = %e,
                        "Failed to recreate tab"
                    );
                    report.failures.push(CreateFailure {
                        position,
                        url: snapshot.url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            context = %context.name,
            window_id = %window_id,
            created = report.created.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Restored context"
        );

        Ok(RestoreOutcome::Restored(report))
    }

    /// Names of all saved contexts, sorted
    pub async fn list_contexts(&self) -> Result<Vec<String>> {
        let keys = self
            .store
            .keys_with_prefix(Scope::Local, CONTEXT_KEY_PREFIX)
            .await?;

        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(CONTEXT_KEY_PREFIX).map(str::to_string))
            .collect())
    }

    /// Delete a saved context. Returns whether it existed.
    pub async fn delete_context(&self, name: &str) -> Result<bool> {
        let Some(name) = lookup_name(name) else {
            return Ok(false);
        };
        let removed = self.store.remove(Scope::Local, &context_key(&name)).await?;

        if removed {
            tracing::info!(context = %name, "Deleted context");
        }

        Ok(removed)
    }
}

impl Clone for ContextManager {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
        }
    }
}

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ContextError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn lookup_name(name: &str) -> Option<String> {
    normalize_name(name).ok()
}
