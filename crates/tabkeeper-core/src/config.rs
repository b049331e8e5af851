//! Process configuration
//!
//! User-facing settings (suspension time, feature flags) live in the store's
//! synced scope; this holds only what the host decides at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::suggest::SuggestionRule;

/// Recurring sweep period
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    pub sweep_interval_secs: u64,
    /// Run the suggestion rule once when the keeper starts
    pub suggest_on_startup: bool,
    pub suggestions: SuggestionRule,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("tabkeeper.db"),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            suggest_on_startup: true,
            suggestions: SuggestionRule::default(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("TabKeeper"))
            .unwrap_or_else(|| PathBuf::from(".tabkeeper"))
    }

    /// Sweep period, never shorter than one second
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/tk"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/tk/tabkeeper.db"));
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));
        assert!(config.suggest_on_startup);
        assert_eq!(config.suggestions, SuggestionRule::default());
    }

    #[test]
    fn test_config_deserializes() {
        let config: Config = serde_json::from_str(
            r#"{
                "database_path": "/var/lib/tk.db",
                "sweep_interval_secs": 60,
                "suggest_on_startup": false,
                "suggestions": {
                    "weekdays_only": false,
                    "start_hour": 7,
                    "end_hour": 9,
                    "urls": ["https://example.com/"]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert!(!config.suggest_on_startup);
        assert_eq!(config.suggestions.urls, vec!["https://example.com/"]);
    }

    #[test]
    fn test_zero_interval_clamped() {
        let mut config = Config::new(PathBuf::from("/tmp/tk"));
        config.sweep_interval_secs = 0;
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }
}
