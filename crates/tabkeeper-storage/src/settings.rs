//! User settings kept in the synced scope
//!
//! Each field is its own key so a settings form can update one value without
//! rewriting the others.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{KeyValueStore, Scope};
use crate::Result;

const ENABLE_CONTEXT_SWITCHING_KEY: &str = "enableContextSwitching";
const SUSPENSION_TIME_KEY: &str = "suspensionTimeMinutes";
/// Key written by older options pages
const LEGACY_SUSPENSION_TIME_KEY: &str = "suspensionTime";

pub const DEFAULT_SUSPENSION_TIME_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub enable_context_switching: bool,
    pub suspension_time_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_context_switching: true,
            suspension_time_minutes: DEFAULT_SUSPENSION_TIME_MINUTES,
        }
    }
}

impl Settings {
    /// Read current settings, falling back to defaults for absent or malformed keys.
    ///
    /// `suspensionTimeMinutes` takes precedence; the legacy `suspensionTime`
    /// key is consulted only when it is absent.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let defaults = Self::default();

        let enable_context_switching = match store
            .get(Scope::Sync, ENABLE_CONTEXT_SWITCHING_KEY)
            .await?
        {
            Some(Value::Bool(b)) => b,
            Some(other) => {
                tracing::warn!(value = %other, "Ignoring malformed enableContextSwitching");
                defaults.enable_context_switching
            }
            None => defaults.enable_context_switching,
        };

        let raw_minutes = match store.get(Scope::Sync, SUSPENSION_TIME_KEY).await? {
            Some(v) => Some(v),
            None => store.get(Scope::Sync, LEGACY_SUSPENSION_TIME_KEY).await?,
        };
        let suspension_time_minutes = match raw_minutes {
            Some(v) => parse_minutes(&v).unwrap_or_else(|| {
                tracing::warn!(value = %v, "Ignoring invalid suspension time");
                defaults.suspension_time_minutes
            }),
            None => defaults.suspension_time_minutes,
        };

        Ok(Self {
            enable_context_switching,
            suspension_time_minutes,
        })
    }

    /// Write both settings keys and drop the legacy suspension key, so the
    /// stored state has one suspension value.
    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store
            .set(
                Scope::Sync,
                ENABLE_CONTEXT_SWITCHING_KEY,
                Value::Bool(self.enable_context_switching),
            )
            .await?;
        store
            .set(
                Scope::Sync,
                SUSPENSION_TIME_KEY,
                Value::from(self.suspension_time_minutes),
            )
            .await?;
        if store.remove(Scope::Sync, LEGACY_SUSPENSION_TIME_KEY).await? {
            tracing::info!("Migrated legacy suspensionTime setting");
        }
        Ok(())
    }

    pub fn suspension_time(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.suspension_time_minutes))
    }
}

/// Accepts positive integers, either as JSON numbers or numeric strings.
fn parse_minutes(value: &Value) -> Option<u32> {
    let minutes = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(minutes).ok().filter(|m| *m > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use serde_json::json;

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let db = Database::open_in_memory().unwrap();
        let settings = Settings::load(&db).await.unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.suspension_time_minutes, 30);
        assert!(settings.enable_context_switching);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let db = Database::open_in_memory().unwrap();
        let settings = Settings {
            enable_context_switching: false,
            suspension_time_minutes: 90,
        };
        settings.save(&db).await.unwrap();

        assert_eq!(Settings::load(&db).await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_invalid_minutes_fall_back() {
        let db = Database::open_in_memory().unwrap();

        db.set(Scope::Sync, SUSPENSION_TIME_KEY, json!(0)).await.unwrap();
        assert_eq!(Settings::load(&db).await.unwrap().suspension_time_minutes, 30);

        db.set(Scope::Sync, SUSPENSION_TIME_KEY, json!(-5)).await.unwrap();
        assert_eq!(Settings::load(&db).await.unwrap().suspension_time_minutes, 30);

        db.set(Scope::Sync, SUSPENSION_TIME_KEY, json!("15")).await.unwrap();
        assert_eq!(Settings::load(&db).await.unwrap().suspension_time_minutes, 15);
    }

    #[tokio::test]
    async fn test_legacy_key_is_read() {
        let db = Database::open_in_memory().unwrap();
        db.set(Scope::Sync, LEGACY_SUSPENSION_TIME_KEY, json!(10))
            .await
            .unwrap();
        assert_eq!(Settings::load(&db).await.unwrap().suspension_time_minutes, 10);

        // The current key wins once written
        db.set(Scope::Sync, SUSPENSION_TIME_KEY, json!(20)).await.unwrap();
        assert_eq!(Settings::load(&db).await.unwrap().suspension_time_minutes, 20);
    }

    #[tokio::test]
    async fn test_save_drops_legacy_key() {
        let db = Database::open_in_memory().unwrap();
        db.set(Scope::Sync, LEGACY_SUSPENSION_TIME_KEY, json!(10))
            .await
            .unwrap();

        let mut settings = Settings::load(&db).await.unwrap();
        settings.suspension_time_minutes = 45;
        settings.save(&db).await.unwrap();

        assert!(db
            .get(Scope::Sync, LEGACY_SUSPENSION_TIME_KEY)
            .await
            .unwrap()
            .is_none());
        assert_eq!(Settings::load(&db).await.unwrap().suspension_time_minutes, 45);
    }
}
