//! Eviction sweeps
//!
//! A sweep is best-effort: one tab failing to discard (closed concurrently,
//! refused by the host) is logged and the remaining tabs are still processed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use tabkeeper_storage::{KeyValueStore, Settings};
use tabkeeper_tabs::{TabId, TabRegistry};

use crate::policy::{EvictionPolicy, Verdict};
use crate::Result;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabFailure {
    pub tab_id: TabId,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub threshold: DateTime<Utc>,
    /// Tabs examined
    pub scanned: usize,
    /// Tabs discarded by this sweep
    pub discarded: Vec<TabId>,
    /// Tabs skipped because an earlier sweep (or the browser) already discarded them
    pub already_discarded: usize,
    pub failures: Vec<TabFailure>,
}

pub struct EvictionEngine {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<dyn TabRegistry>,
}

impl EvictionEngine {
    pub fn new(store: Arc<dyn KeyValueStore>, registry: Arc<dyn TabRegistry>) -> Self {
        Self { store, registry }
    }

    pub async fn run_sweep(&self) -> Result<SweepReport> {
        self.run_sweep_at(Utc::now()).await
    }

    /// Run one sweep as if the current time were `now`.
    ///
    /// Settings are re-read on every sweep so a changed suspension time applies
    /// to the next run without a restart.
    pub async fn run_sweep_at(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let settings = Settings::load(self.store.as_ref()).await?;
        let policy = EvictionPolicy::from_settings(&settings);
        let threshold = policy.threshold(now);

        let tabs = self.registry.query_tabs().await?;

        tracing::info!(
            tab_count = tabs.len(),
            suspension_minutes = settings.suspension_time_minutes,
            threshold = %threshold,
            "Starting eviction sweep"
        );

        let mut report = SweepReport {
            threshold,
            scanned: tabs.len(),
            discarded: Vec::new(),
            already_discarded: 0,
            failures: Vec::new(),
        };

        for tab in &tabs {
            match policy.verdict(tab, threshold) {
                Verdict::Evict => {}
                Verdict::AlreadyDiscarded => {
                    report.already_discarded += 1;
                    continue;
                }
                verdict => {
                    tracing::trace!(tab_id = %tab.id, %verdict, "Keeping tab");
                    continue;
                }
            }

            match self.registry.discard_tab(tab.id).await {
                Ok(_) => {
                    tracing::info!(
                        tab_id = %tab.id,
                        title = %tab.display_title(),
                        "Suspended tab"
                    );
                    report.discarded.push(tab.id);
                }
                Err(e) => {
                    tracing::warn!(tab_id = %tab.id, error = %e, "Failed to discard tab");
                    report.failures.push(TabFailure {
                        tab_id: tab.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            discarded = report.discarded.len(),
            failed = report.failures.len(),
            "Eviction sweep finished"
        );

        Ok(report)
    }
}

impl Clone for EvictionEngine {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
        }
    }
}
