//! SQLite-backed local save store.
//!
//! Used when the remote save endpoint is unreachable. Each save slot is a
//! JSON document keyed by name:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS saves (
//!     save_key   TEXT PRIMARY KEY,
//!     data       BLOB NOT NULL,
//!     updated_at TEXT NOT NULL,
//!     checksum   TEXT
//! );
//! ```
//!
//! - WAL mode for reads during gameplay
//! - JSON inside a BLOB keeps the schema stable as the save format grows
//! - Optional CRC-32 checksum detects save corruption

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::{debug, info, warn};

use crate::config::{OutpostConfig, PersistenceConfig};
use crate::error::{OutpostError, Result};
use crate::state::GameState;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS saves (
    save_key   TEXT PRIMARY KEY,
    data       BLOB NOT NULL,
    updated_at TEXT NOT NULL,
    checksum   TEXT
);";

// ---------------------------------------------------------------------------
// CRC-32 checksum helper
// ---------------------------------------------------------------------------

/// CRC-32 (ISO 3309) of `data` as lowercase hex.
fn crc32_hex(data: &[u8]) -> String {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ POLY } else { crc >> 1 };
        }
    }
    format!("{:08x}", !crc)
}

// ---------------------------------------------------------------------------
// LocalSaveStore
// ---------------------------------------------------------------------------

/// Handle to an open SQLite file of save slots.
///
/// ```no_run
/// # use outpost_core::persistence::LocalSaveStore;
/// # use outpost_core::config::PersistenceConfig;
/// let store = LocalSaveStore::open("outpost_saves.db", &PersistenceConfig::default())?;
/// store.save_json("slot", &serde_json::json!({"hello": "world"}))?;
/// let loaded = store.load_json("slot")?;
/// # Ok::<(), outpost_core::error::OutpostError>(())
/// ```
pub struct LocalSaveStore {
    conn: Connection,
    config: PersistenceConfig,
    db_path: PathBuf,
}

impl std::fmt::Debug for LocalSaveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSaveStore")
            .field("db_path", &self.db_path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LocalSaveStore {
    /// Open (or create) the save file at `path`.
    ///
    /// # Errors
    /// Returns [`OutpostError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(path = %db_path.display(), wal = config.wal_mode, "Local save store opened");

        Ok(Self {
            conn,
            config: config.clone(),
            db_path,
        })
    }

    /// Open the file named in the persistence config.
    ///
    /// # Errors
    /// Returns [`OutpostError::Database`] on SQLite failures.
    pub fn from_config(config: &OutpostConfig) -> Result<Self> {
        Self::open(&config.persistence.path, &config.persistence)
    }

    /// Open an in-memory store (tests, ephemeral sessions).
    ///
    /// # Errors
    /// Returns [`OutpostError::Database`] on SQLite failures.
    pub fn open_in_memory(config: &PersistenceConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            config: config.clone(),
            db_path: PathBuf::from(":memory:"),
        })
    }

    // ------------------------------------------------------------------
    // Core CRUD
    // ------------------------------------------------------------------

    /// Upsert a JSON document under `key`.
    ///
    /// # Errors
    /// [`OutpostError::Serialization`] if encoding fails,
    /// [`OutpostError::Database`] on SQLite failures.
    pub fn save_json(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let start = Instant::now();
        let json = serde_json::to_vec(value).map_err(|e| OutpostError::Serialization(e.to_string()))?;
        let checksum = self.config.checksum_enabled.then(|| crc32_hex(&json));
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO saves (save_key, data, updated_at, checksum)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(save_key) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at,
                checksum = excluded.checksum",
            params![key, json, now, checksum],
        )?;

        debug!(
            key,
            bytes = json.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Saved to local store"
        );
        Ok(())
    }

    /// Load the JSON document under `key`, `None` if absent.
    ///
    /// # Errors
    /// [`OutpostError::Corrupted`] if checksums are enabled and do not match,
    /// [`OutpostError::Serialization`] if the payload is not JSON,
    /// [`OutpostError::Database`] on SQLite failures.
    pub fn load_json(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT data, checksum FROM saves WHERE save_key = ?1")?;
        let row: Option<(Vec<u8>, Option<String>)> = stmt
            .query_row(params![key], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;
        let Some((data, stored_checksum)) = row else {
            return Ok(None);
        };

        if self.config.checksum_enabled {
            if let Some(expected) = stored_checksum {
                let actual = crc32_hex(&data);
                if expected != actual {
                    warn!(key, expected = %expected, actual = %actual, "Checksum mismatch, save corrupted");
                    return Err(OutpostError::Corrupted { key: key.to_string() });
                }
            }
        }

        let value = serde_json::from_slice(&data).map_err(|e| OutpostError::Serialization(e.to_string()))?;
        debug!(key, bytes = data.len(), "Loaded from local store");
        Ok(Some(value))
    }

    /// Save a whole [`GameState`].
    ///
    /// # Errors
    /// See [`Self::save_json`].
    pub fn save_state(&self, key: &str, state: &mut GameState) -> Result<()> {
        let value = state.to_save()?;
        self.save_json(key, &value)
    }

    /// Load a whole [`GameState`], re-applying `config`.
    ///
    /// # Errors
    /// See [`Self::load_json`].
    pub fn load_state(&self, key: &str, config: &OutpostConfig) -> Result<Option<GameState>> {
        self.load_json(key)?
            .map(|value| GameState::from_save(value, config))
            .transpose()
    }

    /// Delete a slot. Returns `true` if a row was removed.
    ///
    /// # Errors
    /// Returns [`OutpostError::Database`] on SQLite failures.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM saves WHERE save_key = ?1", params![key])?;
        Ok(deleted > 0)
    }

    /// Every slot name, sorted.
    ///
    /// # Errors
    /// Returns [`OutpostError::Database`] on SQLite failures.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached("SELECT save_key FROM saves ORDER BY save_key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Path of the database file (or `:memory:`).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NpcId;

    fn config() -> PersistenceConfig {
        PersistenceConfig::default()
    }

    #[test]
    fn crc32_known_vector() {
        assert_eq!(crc32_hex(b"123456789"), "cbf43926");
    }

    #[test]
    fn json_round_trip_and_upsert() {
        let store = LocalSaveStore::open_in_memory(&config()).expect("open");
        assert!(store.load_json("slot").expect("load").is_none());
        store.save_json("slot", &serde_json::json!({"v": 1})).expect("save");
        store.save_json("slot", &serde_json::json!({"v": 2})).expect("save");
        let loaded = store.load_json("slot").expect("load").expect("present");
        assert_eq!(loaded["v"], 2);
        assert_eq!(store.keys().expect("keys"), vec!["slot".to_string()]);
        assert!(store.delete("slot").expect("delete"));
        assert!(!store.delete("slot").expect("delete"));
    }

    #[test]
    fn corrupted_payload_is_reported() {
        let store = LocalSaveStore::open_in_memory(&config()).expect("open");
        store.save_json("slot", &serde_json::json!({"v": 1})).expect("save");
        store
            .conn
            .execute("UPDATE saves SET data = ?1 WHERE save_key = 'slot'", params![b"{\"v\":9}".to_vec()])
            .expect("tamper");
        assert!(matches!(store.load_json("slot"), Err(OutpostError::Corrupted { .. })));
    }

    #[test]
    fn game_state_persists_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("saves.db");
        let outpost = OutpostConfig::default();
        let npc = NpcId::from("scout_jake");
        {
            let store = LocalSaveStore::open(&path, &config()).expect("open");
            let mut state = GameState::new(&outpost);
            state.memory.record_turn(&npc, "My family grew up near the northern ridge", "Rough country.");
            store.save_state("llm-scifi-game-save", &mut state).expect("save");
        }
        let store = LocalSaveStore::open(&path, &config()).expect("reopen");
        let state = store
            .load_state("llm-scifi-game-save", &outpost)
            .expect("load")
            .expect("present");
        assert_eq!(state.memory.memories(&npc).len(), 1);
        assert_eq!(store.keys().expect("keys"), vec!["llm-scifi-game-save".to_string()]);
    }
}
