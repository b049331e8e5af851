//! Main lifecycle container
//!
//! Every trigger (startup, the recurring timer, host messages) enters through
//! here and is routed to the eviction engine, the context manager or the
//! suggester.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;

use tabkeeper_context::{Context, ContextManager, RestoreOutcome};
use tabkeeper_eviction::{EvictionEngine, SweepReport};
use tabkeeper_storage::{Database, KeyValueStore, Settings};
use tabkeeper_tabs::TabRegistry;

use crate::command::{Command, CommandResponse, TabStats};
use crate::config::Config;
use crate::scheduler::SweepScheduler;
use crate::suggest::TabSuggester;
use crate::Result;

pub struct TabKeeper {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    registry: Arc<dyn TabRegistry>,
    eviction: EvictionEngine,
    contexts: ContextManager,
    suggester: TabSuggester,
    /// Present between `start` and `shutdown`
    scheduler: Arc<Mutex<Option<SweepScheduler>>>,
}

impl TabKeeper {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        registry: Arc<dyn TabRegistry>,
    ) -> Self {
        let eviction = EvictionEngine::new(Arc::clone(&store), Arc::clone(&registry));
        let contexts = ContextManager::new(Arc::clone(&store), Arc::clone(&registry));
        let suggester = TabSuggester::new(Arc::clone(&registry), config.suggestions.clone());

        Self {
            config,
            store,
            registry,
            eviction,
            contexts,
            suggester,
            scheduler: Arc::new(Mutex::new(None)),
        }
    }

    /// Open the on-disk store named by `config` and build a keeper over it
    pub fn open(config: Config, registry: Arc<dyn TabRegistry>) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::new(config, Arc::new(db), registry))
    }

    /// Startup trigger: run the suggestion rule once and start the recurring sweep.
    pub async fn start(&self) -> Result<()> {
        let settings = self.settings().await?;
        tracing::info!(
            suspension_minutes = settings.suspension_time_minutes,
            context_switching = settings.enable_context_switching,
            "TabKeeper starting"
        );

        if self.config.suggest_on_startup {
            if let Err(e) = self.suggester.suggest().await {
                tracing::warn!(error = %e, "Startup tab suggestions failed");
            }
        }

        let mut scheduler = self.scheduler.lock();
        if scheduler.is_none() {
            *scheduler = Some(SweepScheduler::start(
                self.eviction.clone(),
                self.config.sweep_interval(),
            ));
        }

        Ok(())
    }

    /// Cancel the recurring sweep and wait for it to stop
    pub async fn shutdown(&self) {
        let scheduler = self.scheduler.lock().take();
        if let Some(scheduler) = scheduler {
            scheduler.shutdown().await;
            tracing::info!("TabKeeper stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler
            .lock()
            .as_ref()
            .is_some_and(SweepScheduler::is_running)
    }

    // === Commands ===

    /// Route one command and report its completion.
    ///
    /// Per-tab failures inside a sweep or restore are logged and never turn
    /// into `Err`; only whole-operation failures (store or registry
    /// unreachable) do.
    pub async fn invoke(&self, command: Command) -> Result<CommandResponse> {
        tracing::debug!(action = command.action(), "Handling command");

        match command {
            Command::SuspendInactiveTabs => {
                let engine = self.eviction.clone();
                tokio::spawn(async move {
                    if let Err(e) = engine.run_sweep().await {
                        tracing::error!(error = %e, "Eviction sweep failed");
                    }
                });
                Ok(CommandResponse::status("Tab suspension initiated."))
            }
            Command::SaveContext { name } => {
                let context = self.save_context(&name).await?;
                Ok(CommandResponse::status(format!(
                    "Context '{}' saved.",
                    context.name
                )))
            }
            Command::RestoreContext { name } => {
                let name = name.trim().to_string();
                match self.restore_context(&name).await? {
                    RestoreOutcome::Restored(_) => Ok(CommandResponse::status(format!(
                        "Context '{}' restored.",
                        name
                    ))),
                    RestoreOutcome::NotFound => Ok(CommandResponse::status(format!(
                        "No context found for '{}'.",
                        name
                    ))),
                }
            }
            Command::SuggestTabs => {
                let suggester = self.suggester.clone();
                tokio::spawn(async move {
                    if let Err(e) = suggester.suggest().await {
                        tracing::error!(error = %e, "Tab suggestions failed");
                    }
                });
                Ok(CommandResponse::status("Predictive tab opening initiated."))
            }
            Command::ListContexts => {
                let names = self.list_contexts().await?;
                Ok(CommandResponse::status(format!("{} saved contexts.", names.len()))
                    .with_contexts(names))
            }
            Command::DeleteContext { name } => {
                let name = name.trim().to_string();
                if self.delete_context(&name).await? {
                    Ok(CommandResponse::status(format!("Context '{}' deleted.", name)))
                } else {
                    Ok(CommandResponse::status(format!(
                        "No context found for '{}'.",
                        name
                    )))
                }
            }
            Command::TabStats => {
                let stats = self.tab_stats().await?;
                Ok(CommandResponse::status(format!(
                    "{} open, {} suspended.",
                    stats.open, stats.suspended
                ))
                .with_stats(stats))
            }
        }
    }

    /// Run `invoke` on the runtime and hand back a receiver for the response,
    /// so a host message handler can return immediately.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn dispatch(&self, command: Command) -> oneshot::Receiver<Result<CommandResponse>> {
        let (tx, rx) = oneshot::channel();
        let keeper = self.clone();

        tokio::spawn(async move {
            let response = keeper.invoke(command).await;
            if tx.send(response).is_err() {
                tracing::debug!("Command caller went away before completion");
            }
        });

        rx
    }

    // === Eviction operations ===

    pub async fn run_sweep(&self) -> Result<SweepReport> {
        Ok(self.eviction.run_sweep().await?)
    }

    pub fn eviction(&self) -> &EvictionEngine {
        &self.eviction
    }

    // === Context operations ===

    pub async fn save_context(&self, name: &str) -> Result<Context> {
        Ok(self.contexts.save_context(name).await?)
    }

    pub async fn restore_context(&self, name: &str) -> Result<RestoreOutcome> {
        Ok(self.contexts.restore_context(name).await?)
    }

    pub async fn list_contexts(&self) -> Result<Vec<String>> {
        Ok(self.contexts.list_contexts().await?)
    }

    pub async fn delete_context(&self, name: &str) -> Result<bool> {
        Ok(self.contexts.delete_context(name).await?)
    }

    pub fn contexts(&self) -> &ContextManager {
        &self.contexts
    }

    // === Suggestions ===

    pub async fn suggest_tabs(&self) -> Result<Vec<String>> {
        self.suggester.suggest().await
    }

    pub fn suggester(&self) -> &TabSuggester {
        &self.suggester
    }

    // === Stats and settings ===

    pub async fn tab_stats(&self) -> Result<TabStats> {
        let tabs = self.registry.query_tabs().await?;
        Ok(TabStats {
            open: tabs.len(),
            suspended: tabs.iter().filter(|t| t.discarded).count(),
        })
    }

    pub async fn settings(&self) -> Result<Settings> {
        Ok(Settings::load(self.store.as_ref()).await?)
    }

    pub async fn update_settings(&self, settings: &Settings) -> Result<()> {
        settings.save(self.store.as_ref()).await?;
        tracing::info!(
            suspension_minutes = settings.suspension_time_minutes,
            context_switching = settings.enable_context_switching,
            "Settings updated"
        );
        Ok(())
    }

    // === Config ===

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Clone for TabKeeper {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
            eviction: self.eviction.clone(),
            contexts: self.contexts.clone(),
            suggester: self.suggester.clone(),
            scheduler: Arc::clone(&self.scheduler),
        }
    }
}
