//! Fallback storage trait with SQLite and in-memory implementations.
//!
//! The whole roster lives in one named slot as a JSON-serialized array;
//! writers rewrite the slot wholesale rather than diffing records.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

use crate::store::types::Employee;

/// Name of the slot holding the serialized roster.
const ROSTER_SLOT: &str = "employees";

#[derive(Debug, Error)]
pub enum CacheError {
  #[error("cache database error: {0}")]
  Db(#[from] rusqlite::Error),
  #[error("cache serialization error: {0}")]
  Serde(#[from] serde_json::Error),
  #[error("cache io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("cache lock poisoned")]
  Poisoned,
  #[error("could not determine data directory")]
  NoDataDir,
  #[error("invalid cache timestamp '{0}'")]
  BadTimestamp(String),
}

/// The cached roster together with when it was written.
#[derive(Debug, Clone)]
pub struct CachedRoster {
  pub employees: Vec<Employee>,
  pub saved_at: DateTime<Utc>,
}

/// Storage backend for the fallback roster.
pub trait CacheStore: Send + Sync {
  /// Read the roster slot, if it has ever been written.
  fn load(&self) -> Result<Option<CachedRoster>, CacheError>;

  /// Replace the roster slot with the given employees.
  fn save(&self, employees: &[Employee]) -> Result<(), CacheError>;
}

/// SQLite-backed roster storage.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

/// Schema for the roster slot table.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS roster_cache (
    slot TEXT PRIMARY KEY,
    data BLOB NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl SqliteStore {
  /// Open or create the cache database at the default location.
  pub fn open() -> Result<Self, CacheError> {
    let path = Self::default_path()?;

    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    Self::from_connection(Connection::open(&path)?)
  }

  /// In-memory database, used by tests.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self, CacheError> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  fn from_connection(conn: Connection) -> Result<Self, CacheError> {
    conn.execute_batch(CACHE_SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn default_path() -> Result<PathBuf, CacheError> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or(CacheError::NoDataDir)?;

    Ok(data_dir.join("staffdir").join("cache.db"))
  }
}

impl CacheStore for SqliteStore {
  fn load(&self) -> Result<Option<CachedRoster>, CacheError> {
    let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;

    let mut stmt = conn.prepare("SELECT data, saved_at FROM roster_cache WHERE slot = ?")?;
    let row: Option<(Vec<u8>, String)> = stmt
      .query_row(params![ROSTER_SLOT], |row| Ok((row.get(0)?, row.get(1)?)))
      .ok();

    match row {
      Some((data, saved_at)) => Ok(Some(CachedRoster {
        employees: serde_json::from_slice(&data)?,
        saved_at: parse_datetime(&saved_at)?,
      })),
      None => Ok(None),
    }
  }

  fn save(&self, employees: &[Employee]) -> Result<(), CacheError> {
    let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
    let data = serde_json::to_vec(employees)?;

    conn.execute(
      "INSERT OR REPLACE INTO roster_cache (slot, data, saved_at)
       VALUES (?, ?, datetime('now'))",
      params![ROSTER_SLOT, data],
    )?;

    Ok(())
  }
}

/// In-memory roster storage. Used in tests and when persistence is
/// disabled with `--no-cache`.
#[derive(Default)]
pub struct MemoryStore {
  slot: Mutex<Option<CachedRoster>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Pre-populate the slot, for tests that start with a warm cache.
  #[cfg(test)]
  pub fn seeded(employees: Vec<Employee>) -> Self {
    Self {
      slot: Mutex::new(Some(CachedRoster {
        employees,
        saved_at: Utc::now(),
      })),
    }
  }
}

impl CacheStore for MemoryStore {
  fn load(&self) -> Result<Option<CachedRoster>, CacheError> {
    let slot = self.slot.lock().map_err(|_| CacheError::Poisoned)?;
    Ok(slot.clone())
  }

  fn save(&self, employees: &[Employee]) -> Result<(), CacheError> {
    let mut slot = self.slot.lock().map_err(|_| CacheError::Poisoned)?;
    *slot = Some(CachedRoster {
      employees: employees.to_vec(),
      saved_at: Utc::now(),
    });
    Ok(())
  }
}

/// Parse a datetime in SQLite's "YYYY-MM-DD HH:MM:SS" format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, CacheError> {
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|_| CacheError::BadTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn employee(id: u64, name: &str) -> Employee {
    Employee {
      id,
      full_name: name.to_string(),
      job_title: "Engineer".to_string(),
      department: "R&D".to_string(),
      date_of_joining: NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
      profile_picture: Some("https://example.com/pic.png".to_string()),
    }
  }

  #[test]
  fn test_sqlite_empty_slot_loads_none() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(store.load().unwrap().is_none());
  }

  #[test]
  fn test_sqlite_save_load_round_trip() {
    let store = SqliteStore::open_in_memory().unwrap();
    let roster = vec![employee(1, "Ada Lovelace"), employee(3, "Grace Hopper")];

    store.save(&roster).unwrap();
    let loaded = store.load().unwrap().unwrap();

    assert_eq!(loaded.employees, roster);
  }

  #[test]
  fn test_sqlite_save_overwrites_slot() {
    let store = SqliteStore::open_in_memory().unwrap();

    store.save(&[employee(1, "Ada Lovelace")]).unwrap();
    store.save(&[employee(2, "Grace Hopper")]).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.employees.len(), 1);
    assert_eq!(loaded.employees[0].id, 2);
  }

  #[test]
  fn test_memory_store_round_trip() {
    let store = MemoryStore::new();
    assert!(store.load().unwrap().is_none());

    let roster = vec![employee(5, "Ada Lovelace")];
    store.save(&roster).unwrap();

    assert_eq!(store.load().unwrap().unwrap().employees, roster);
  }

  #[test]
  fn test_parse_sqlite_datetime() {
    let dt = parse_datetime("2026-08-23 10:30:00").unwrap();
    assert_eq!(dt.to_rfc3339(), "2026-08-23T10:30:00+00:00");
    assert!(parse_datetime("not a date").is_err());
  }
}
