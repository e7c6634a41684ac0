use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::persistence::{FileStore, MemoryStore, PersistenceError, SnapshotStore};
use crate::store::DEFAULT_SNAPSHOT_KEY;

pub const CONFIG_ENV_VAR: &str = "WORKOUT_PLANNER_CONFIG";
pub const BACKEND_ENV_VAR: &str = "WORKOUT_PLANNER_BACKEND";
pub const DATA_DIR_ENV_VAR: &str = "WORKOUT_PLANNER_DATA_DIR";

const APP_DIR: &str = "workout-planner";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unknown storage backend '{0}' (expected memory, file or sqlite)")]
    UnknownBackend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    File,
    Sqlite,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// Directory holding snapshot files or the SQLite database.
    pub data_dir: PathBuf,
    /// Byte limit for the in-memory backend.
    pub capacity_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            data_dir: default_data_dir(),
            capacity_bytes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub storage: StorageConfig,
    pub snapshot_key: String,
    pub log_filter: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            log_filter: "workout_planner=info".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Reads a JSON config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `WORKOUT_PLANNER_BACKEND` and `WORKOUT_PLANNER_DATA_DIR`.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(
            std::env::var(BACKEND_ENV_VAR).ok().as_deref(),
            std::env::var_os(DATA_DIR_ENV_VAR).map(PathBuf::from),
        )
    }

    pub fn apply_overrides(
        &mut self,
        backend: Option<&str>,
        data_dir: Option<PathBuf>,
    ) -> Result<(), ConfigError> {
        if let Some(backend) = backend {
            self.storage.backend = backend.parse()?;
        }
        if let Some(dir) = data_dir {
            self.storage.data_dir = dir;
        }
        Ok(())
    }

    pub fn open_backend(&self) -> Result<Box<dyn SnapshotStore>, PersistenceError> {
        let storage = &self.storage;
        let backend: Box<dyn SnapshotStore> = match storage.backend {
            BackendKind::Memory => match storage.capacity_bytes {
                Some(limit) => Box::new(MemoryStore::with_capacity_limit(limit)),
                None => Box::new(MemoryStore::new()),
            },
            BackendKind::File => Box::new(FileStore::new(storage.data_dir.clone())),
            BackendKind::Sqlite => open_sqlite(&storage.data_dir)?,
        };
        tracing::debug!(backend = %storage.backend, dir = %storage.data_dir.display(), "opened snapshot backend");
        Ok(backend)
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(dir: &Path) -> Result<Box<dyn SnapshotStore>, PersistenceError> {
    fs::create_dir_all(dir)?;
    let store = crate::persistence::sqlite::SqliteStore::new(dir.join("planner.sqlite"))?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_dir: &Path) -> Result<Box<dyn SnapshotStore>, PersistenceError> {
    Err(PersistenceError::Unavailable(
        "rebuild with the `sqlite` feature to use the sqlite backend".into(),
    ))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
