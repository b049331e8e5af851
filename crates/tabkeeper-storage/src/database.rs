//! SQLite-backed key/value store

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::store::{KeyValueStore, Scope};
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for better concurrent performance
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await?
    }
}

fn read_raw(conn: &Connection, scope: Scope, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE scope = ?1 AND key = ?2",
            [scope.as_str(), key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

fn write_raw(conn: &Connection, scope: Scope, key: &str, value: &str) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR REPLACE INTO kv_store (scope, key, value, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![scope.as_str(), key, value, updated_at],
    )?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>> {
        let key = key.to_string();
        match self.run_blocking(move |conn| read_raw(conn, scope, &key)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()> {
        let raw = serde_json::to_string(&value)?;
        let owned = key.to_string();
        self.run_blocking(move |conn| write_raw(conn, scope, &owned, &raw))
            .await?;
        tracing::debug!(scope = %scope, key = %key, "Stored value");
        Ok(())
    }

    async fn remove(&self, scope: Scope, key: &str) -> Result<bool> {
        let key = key.to_string();
        let removed = self
            .run_blocking(move |conn| {
                let n = conn.execute(
                    "DELETE FROM kv_store WHERE scope = ?1 AND key = ?2",
                    [scope.as_str(), key.as_str()],
                )?;
                Ok(n)
            })
            .await?;
        Ok(removed > 0)
    }

    async fn keys_with_prefix(&self, scope: Scope, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.to_string();
        self.run_blocking(move |conn| {
            let mut stmt =
                conn.prepare("SELECT key FROM kv_store WHERE scope = ?1 ORDER BY key")?;
            let keys = stmt
                .query_map([scope.as_str()], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(keys
                .into_iter()
                .filter(|k| k.starts_with(prefix.as_str()))
                .collect())
        })
        .await
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_set_round_trip() {
        let db = Database::open_in_memory().unwrap();

        assert!(db.get(Scope::Local, "missing").await.unwrap().is_none());

        db.set(Scope::Local, "context_work", json!({"tabs": [], "windowId": 3}))
            .await
            .unwrap();
        let value = db.get(Scope::Local, "context_work").await.unwrap().unwrap();
        assert_eq!(value["windowId"], 3);
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let db = Database::open_in_memory().unwrap();

        db.set(Scope::Sync, "suspensionTimeMinutes", json!(45))
            .await
            .unwrap();

        assert!(db
            .get(Scope::Local, "suspensionTimeMinutes")
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            db.get(Scope::Sync, "suspensionTimeMinutes").await.unwrap(),
            Some(json!(45))
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let db = Database::open_in_memory().unwrap();

        db.set(Scope::Local, "k", json!("first")).await.unwrap();
        db.set(Scope::Local, "k", json!("second")).await.unwrap();

        assert_eq!(db.get(Scope::Local, "k").await.unwrap(), Some(json!("second")));
    }

    #[tokio::test]
    async fn test_keys_with_prefix_and_remove() {
        let db = Database::open_in_memory().unwrap();

        db.set(Scope::Local, "context_b", json!(1)).await.unwrap();
        db.set(Scope::Local, "context_a", json!(1)).await.unwrap();
        db.set(Scope::Local, "other", json!(1)).await.unwrap();
        db.set(Scope::Sync, "context_sync", json!(1)).await.unwrap();

        let keys = db.keys_with_prefix(Scope::Local, "context_").await.unwrap();
        assert_eq!(keys, vec!["context_a", "context_b"]);

        assert!(db.remove(Scope::Local, "context_a").await.unwrap());
        assert!(!db.remove(Scope::Local, "context_a").await.unwrap());

        let keys = db.keys_with_prefix(Scope::Local, "context_").await.unwrap();
        assert_eq!(keys, vec!["context_b"]);
    }

    #[tokio::test]
    async fn test_locked_connection_does_not_stall_runtime() {
        let db = Database::open_in_memory().unwrap();
        let held = Arc::clone(&db.conn);
        let (locked_tx, locked_rx) = std::sync::mpsc::channel();

        let holder = std::thread::spawn(move || {
            let _guard = held.lock();
            locked_tx.send(()).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(300));
        });
        locked_rx.recv().unwrap();

        // Single-threaded runtime: the timer only fires if `get` yields
        let get = db.get(Scope::Local, "k");
        tokio::pin!(get);
        let timer_won = tokio::select! {
            biased;
            _ = &mut get => false,
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => true,
        };
        assert!(timer_won);

        assert!(get.await.unwrap().is_none());
        holder.join().unwrap();
    }
}
