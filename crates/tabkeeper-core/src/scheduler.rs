//! Recurring eviction sweep
//!
//! The sweep loop is an owned task handle: created by `TabKeeper::start`,
//! cancelled by `TabKeeper::shutdown`. Its own sweeps never overlap; a tick
//! that arrives while a sweep is still running is skipped.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use tabkeeper_eviction::EvictionEngine;

pub struct SweepScheduler {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweepScheduler {
    /// Spawn the sweep loop. The first sweep runs one `period` after start.
    pub fn start(engine: EvictionEngine, period: Duration) -> Self {
        let (stop, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = engine.run_sweep().await {
                            tracing::error!(error = %e, "Scheduled eviction sweep failed");
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("Sweep scheduler stopped");
        });

        tracing::info!(period_secs = period.as_secs(), "Sweep scheduler started");

        Self { stop, handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the loop and wait for an in-flight sweep to finish
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Sweep scheduler task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use tabkeeper_storage::Database;
    use tabkeeper_tabs::{CreateTab, Tab, TabManager};

    fn idle_tab(tabs: &TabManager, url: &str) -> Tab {
        tabs.open_tab_at(
            CreateTab {
                url: url.to_string(),
                active: false,
                ..Default::default()
            },
            Utc::now() - chrono::Duration::hours(2),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeps_on_interval_until_shutdown() {
        let tabs = TabManager::new();
        tabs.open_window();
        tabs.open_tab(CreateTab::new("https://focused.example")).unwrap();
        let idle = idle_tab(&tabs, "https://idle.example");

        let engine = EvictionEngine::new(
            Arc::new(Database::open_in_memory().unwrap()),
            Arc::new(tabs.clone()),
        );
        let scheduler = SweepScheduler::start(engine, Duration::from_secs(300));
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert!(!tabs.get_tab(idle.id).unwrap().discarded);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(tabs.get_tab(idle.id).unwrap().discarded);

        scheduler.shutdown().await;

        let late = idle_tab(&tabs, "https://late.example");
        tokio::time::sleep(Duration::from_secs(900)).await;
        assert!(!tabs.get_tab(late.id).unwrap().discarded);
    }
}
