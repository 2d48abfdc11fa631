//! Persisted fallback roster used when the directory API is unreachable.

mod storage;

pub use storage::{CacheError, CacheStore, CachedRoster, MemoryStore, SqliteStore};
