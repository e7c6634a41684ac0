use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// A stored value exists but cannot be decoded as text.
    #[error("malformed stored value: {0}")]
    Malformed(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Key-value medium holding serialized snapshots.
///
/// Values are read and written whole; a failed write must leave the previous value in place.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> PersistenceResult<()>;
    /// Deletes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> PersistenceResult<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> PersistenceResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        (**self).remove(key)
    }
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    FileStore, load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv,
    save_schedule_to_json,
};
pub use memory::MemoryStore;
