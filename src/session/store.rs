//! Durable session storage
//!
//! A flat key-value space shared by every process that touches the session.
//! Values are JSON text so a stored session can be inspected with `sqlite3`.

#[cfg(test)]
use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Every key the session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum StateKey {
    Events,
    Forward,
    Semester,
    TotalWeeks,
    Year,
    LastError,
}

impl StateKey {
    #[cfg(test)]
    pub(crate) const ALL: [StateKey; 6] = [
        StateKey::Events,
        StateKey::Forward,
        StateKey::Semester,
        StateKey::TotalWeeks,
        StateKey::Year,
        StateKey::LastError,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            StateKey::Events => "events",
            StateKey::Forward => "forward",
            StateKey::Semester => "semester",
            StateKey::TotalWeeks => "totalWeeks",
            StateKey::Year => "year",
            StateKey::LastError => "lastError",
        }
    }
}

/// Key-value storage behind the session controller
pub(crate) trait StateStore {
    fn read(&self, key: StateKey) -> Result<Option<String>, StoreError>;

    /// Write all entries or none of them
    fn write(&mut self, entries: &[(StateKey, String)]) -> Result<(), StoreError>;

    /// Like [`StateStore::write`], but only while an `events` key exists.
    /// Returns `false` and writes nothing when the session is gone.
    fn write_if_active(&mut self, entries: &[(StateKey, String)]) -> Result<bool, StoreError>;

    fn remove(&mut self, key: StateKey) -> Result<(), StoreError>;

    /// Remove every key
    fn clear(&mut self) -> Result<(), StoreError>;

    fn get<T: DeserializeOwned>(&self, key: StateKey) -> Result<Option<T>, StoreError>
    where
        Self: Sized,
    {
        self.read(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
                    key: key.as_str(),
                    source,
                })
            })
            .transpose()
    }

    fn set<T: Serialize>(&mut self, key: StateKey, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let raw = encode(key, value)?;
        self.write(&[(key, raw)])
    }
}

/// Serialize one value for storage under `key`
pub(crate) fn encode<T: Serialize>(key: StateKey, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.as_str(),
        source,
    })
}

/// SQLite-backed store, one row per key
pub(crate) struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the session database at `path`
    pub(crate) fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session_state (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }
}

impl StateStore for SqliteStore {
    fn read(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session_state WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, entries: &[(StateKey, String)]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO session_state (key, value) VALUES (?1, ?2)",
                params![key.as_str(), value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn write_if_active(&mut self, entries: &[(StateKey, String)]) -> Result<bool, StoreError> {
        // Write lock held from the check through the commit
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let active = tx
            .query_row(
                "SELECT 1 FROM session_state WHERE key = ?1",
                params![StateKey::Events.as_str()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !active {
            return Ok(false);
        }
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO session_state (key, value) VALUES (?1, ?2)",
                params![key.as_str(), value],
            )?;
        }
        tx.commit()?;
        Ok(true)
    }

    fn remove(&mut self, key: StateKey) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM session_state WHERE key = ?1",
            params![key.as_str()],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM session_state", [])?;
        Ok(())
    }
}

/// Process-local store
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    values: HashMap<StateKey, String>,
    /// Make every write fail
    pub(crate) fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }
}

#[cfg(test)]
impl StateStore for MemoryStore {
    fn read(&self, key: StateKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(&key).cloned())
    }

    fn write(&mut self, entries: &[(StateKey, String)]) -> Result<(), StoreError> {
        self.check_writable()?;
        for (key, value) in entries {
            self.values.insert(*key, value.clone());
        }
        Ok(())
    }

    fn write_if_active(&mut self, entries: &[(StateKey, String)]) -> Result<bool, StoreError> {
        self.check_writable()?;
        if !self.values.contains_key(&StateKey::Events) {
            return Ok(false);
        }
        self.write(entries)?;
        Ok(true)
    }

    fn remove(&mut self, key: StateKey) -> Result<(), StoreError> {
        self.values.remove(&key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.values.clear();
        Ok(())
    }
}
