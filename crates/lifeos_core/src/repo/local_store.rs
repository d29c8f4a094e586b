//! Local key-value slice store with one-generation backups.
//!
//! # Responsibility
//! - Persist module state slices as JSON text under stable keys.
//! - Shadow the previous value under `<key>Backup` on every overwrite and
//!   support restoring it.
//!
//! # Invariants
//! - The previous value is shadowed before the new value lands; the two
//!   writes are best-effort, not atomic.
//! - `restore_backup` is idempotent and never clears the backup slot.
//! - Module reset touches only the module's primary keys.
//!
//! # See also
//! - docs/architecture/storage.md

use crate::db::DbError;
use crate::model::modules::ModuleKind;
use chrono::Utc;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Suffix of the shadow slot written before every overwrite.
pub const BACKUP_SUFFIX: &str = "Backup";

pub type StoreResult<T> = Result<T, StoreError>;

/// Local store persistence errors.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode slice value: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Returns the backup key for one slice key.
pub fn backup_key(key: &str) -> String {
    format!("{key}{BACKUP_SUFFIX}")
}

/// SQLite-backed slice store over the `kv_store` table.
pub struct LocalStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> LocalStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Raw JSON text under one key, no decoding.
    pub fn raw_get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// First present value along a key fallback chain.
    pub fn raw_get_first(&self, keys: &[&str]) -> StoreResult<Option<(String, String)>> {
        for key in keys {
            if let Some(value) = self.raw_get(key)? {
                return Ok(Some((key.to_string(), value)));
            }
        }
        Ok(None)
    }

    /// Decoded value under one key.
    ///
    /// A present-but-unparseable value is treated as a miss: the parse
    /// failure is logged and `Ok(None)` returned, so callers fall back to
    /// defaults instead of wedging on corrupt state.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.raw_get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!("event=slice_get module=repo status=parse_fallback key={key} error={err}");
                Ok(None)
            }
        }
    }

    /// Writes a slice value, shadowing the previous value first.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let encoded = serde_json::to_string(value)?;
        self.set_raw(key, &encoded)
    }

    /// Raw variant of [`set`](Self::set) for already-encoded payloads.
    ///
    /// Backup first, then overwrite. The two writes are deliberately
    /// separate statements; a failure between them leaves the previous
    /// value both live and shadowed.
    pub fn set_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        if let Some(previous) = self.raw_get(key)? {
            self.conn.execute(
                "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3);",
                params![backup_key(key), previous, now_ms],
            )?;
        }
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3);",
            params![key, value, now_ms],
        )?;
        Ok(())
    }

    /// Decoded value with a caller-supplied default for misses.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> StoreResult<T> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Copies the backup shadow back over the primary slot.
    ///
    /// Returns `true` when a backup existed. The backup slot itself stays
    /// in place, so repeated restores are safe.
    pub fn restore_backup(&self, key: &str) -> StoreResult<bool> {
        let Some(backup) = self.raw_get(&backup_key(key))? else {
            return Ok(false);
        };
        let now_ms = Utc::now().timestamp_millis();
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3);",
            params![key, backup, now_ms],
        )?;
        info!("event=slice_restore module=repo status=ok key={key}");
        Ok(true)
    }

    /// Removes one key. The backup shadow is not touched.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", params![key])?;
        Ok(())
    }

    /// Clears a module's primary slice keys.
    ///
    /// Backup shadows and the remote record are left intact so the state
    /// remains recoverable.
    pub fn reset_module(&self, module: ModuleKind) -> StoreResult<usize> {
        let mut cleared = 0usize;
        let tx = self.conn.unchecked_transaction()?;
        for key in module.primary_keys() {
            cleared += tx.execute("DELETE FROM kv_store WHERE key = ?1;", params![key])?;
        }
        tx.commit()?;
        info!("event=module_reset module=repo status=ok target={module} cleared={cleared}");
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::{backup_key, LocalStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn backup_key_appends_suffix() {
        assert_eq!(backup_key("peopleRelationships"), "peopleRelationshipsBackup");
    }

    #[test]
    fn parse_failure_reads_as_miss() {
        let conn = open_db_in_memory().expect("open in-memory db");
        let store = LocalStore::new(&conn);
        store.set_raw("skillFocusSprint", "{not json").expect("raw write");
        let decoded: Option<Vec<u32>> = store.get("skillFocusSprint").expect("get");
        assert!(decoded.is_none());
    }
}
