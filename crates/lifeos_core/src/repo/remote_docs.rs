//! SQLite-backed remote module-document store.
//!
//! # Responsibility
//! - Implement the remote document contract over the `lifeos_data` table so
//!   a single-machine deployment gets the same reconcile semantics as a
//!   hosted backend.
//!
//! # Invariants
//! - One row per `(module, user_id)`; saves upsert in place.
//! - `updated_at` records the save instant as an RFC 3339 timestamp.
//!
//! # See also
//! - docs/architecture/sync.md

use crate::sync::remote::{RemoteStore, RemoteStoreError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::sync::Mutex;

/// Document store persisting to the local database.
///
/// Owns its connection; the reconciler may call from any thread.
pub struct SqliteRemoteStore {
    conn: Mutex<Connection>,
}

impl SqliteRemoteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

fn db_error(context: &str, err: impl std::fmt::Display) -> RemoteStoreError {
    RemoteStoreError::permanent("sqlite", format!("{context}: {err}"))
}

impl RemoteStore for SqliteRemoteStore {
    fn load(&self, module: &str, user_id: &str) -> Result<Option<Value>, RemoteStoreError> {
        let conn = self.conn.lock().expect("remote db lock poisoned");
        let raw = conn
            .query_row(
                "SELECT data FROM lifeos_data WHERE module = ?1 AND user_id = ?2;",
                params![module, user_id],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|err| db_error("load document", err))?;

        match raw {
            None => Ok(None),
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|err| db_error("decode document", err)),
        }
    }

    fn save(&self, module: &str, user_id: &str, data: &Value) -> Result<(), RemoteStoreError> {
        let encoded =
            serde_json::to_string(data).map_err(|err| db_error("encode document", err))?;
        let conn = self.conn.lock().expect("remote db lock poisoned");
        conn.execute(
            "INSERT INTO lifeos_data (module, user_id, data, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(module, user_id) DO UPDATE SET
                 data = excluded.data,
                 updated_at = excluded.updated_at;",
            params![module, user_id, encoded, Utc::now().to_rfc3339()],
        )
        .map_err(|err| db_error("save document", err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteRemoteStore;
    use crate::db::open_db_in_memory;
    use crate::sync::remote::RemoteStore;
    use serde_json::json;

    #[test]
    fn upsert_keeps_one_row_per_module_and_user() {
        let store = SqliteRemoteStore::new(open_db_in_memory().expect("open in-memory db"));

        store
            .save("career", "user-1", &json!({"phases": [], "version": 1}))
            .expect("first save");
        store
            .save("career", "user-1", &json!({"phases": [{"id": 1}], "version": 1}))
            .expect("second save");

        let loaded = store.load("career", "user-1").expect("load").expect("doc");
        assert_eq!(loaded["phases"][0]["id"], 1);
        assert!(store.load("career", "user-2").expect("load").is_none());
    }
}
