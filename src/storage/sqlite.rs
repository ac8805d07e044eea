use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use crate::data::error::ClientResult;
use crate::storage::KeyValueStore;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(db_path: &str) -> ClientResult<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP NOT NULL
            );
            "#
        )?;

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let value = self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> ClientResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_keys(store: &SqliteStore) -> usize {
        store.conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_put_then_get() {
        let store = SqliteStore::new(":memory:").unwrap();
        store.put("predictionHistory", r#"[{"a":1}]"#).unwrap();

        assert_eq!(
            store.get("predictionHistory").unwrap().as_deref(),
            Some(r#"[{"a":1}]"#)
        );
    }

    #[test]
    fn test_put_is_whole_value_replace() {
        let store = SqliteStore::new(":memory:").unwrap();
        store.put("k", "first").unwrap();
        store.put("k", "second").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
        assert_eq!(count_keys(&store), 1);
    }

    #[test]
    fn test_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "matchboard-kv-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path_str = path.to_string_lossy().to_string();

        {
            let store = SqliteStore::new(&path_str).unwrap();
            store.put("k", "persisted").unwrap();
        }

        let reopened = SqliteStore::new(&path_str).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("persisted"));

        let _ = std::fs::remove_file(&path);
    }
}
