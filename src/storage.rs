use crate::errors::StoreError;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, error, warn};

pub const ACTIVITIES_KEY: &str = "activities";
pub const GOALS_KEY: &str = "goals";

/// Durable key-value storage of record sequences.
///
/// `load` returns `None` when nothing usable is stored under `key`; callers
/// substitute their defaults. A successful `save` is observed by the next
/// `load` of the same key.
pub trait Store {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>>;
    fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StoreError>;
}

pub fn resolve_data_dir() -> PathBuf {
    match env::var("APP_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("data"),
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Moves an unparseable data file out of the way so the next save does
    /// not overwrite it. An older copy is never replaced.
    fn set_aside(&self, key: &str, path: &Path) {
        let mut target = self.dir.join(format!("{key}.json.corrupt"));
        if target.exists() {
            let stamp = Utc::now().timestamp_millis();
            target = self.dir.join(format!("{key}.json.corrupt.{stamp}"));
        }
        match fs::rename(path, &target) {
            Ok(()) => warn!(key, kept = %target.display(), "moved unreadable data file aside"),
            Err(err) => error!(key, "failed to move unreadable data file aside: {err}"),
        }
    }
}

impl Store for JsonFileStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(records) => Some(records),
                Err(err) => {
                    error!(key, path = %path.display(), "failed to parse data file: {err}");
                    self.set_aside(key, &path);
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                error!(key, path = %path.display(), "failed to read data file: {err}");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(self.path_for(key), payload))
            .map_err(|source| StoreError::Io {
                key: key.to_string(),
                source,
            })?;
        debug!(key, count = records.len(), "persisted collection");
        Ok(())
    }
}

/// Keeps serialized JSON in memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    reject_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `save` fail as if the storage quota were exhausted.
    pub fn reject_writes(&self, reject: bool) {
        *self.reject_writes.lock().unwrap_or_else(|e| e.into_inner()) = reject;
    }

    /// Raw JSON stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn insert_raw(&self, key: &str, json: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), json.into());
    }
}

impl Store for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let raw = self.raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(records) => Some(records),
            Err(err) => {
                error!(key, "failed to parse stored collection: {err}");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StoreError> {
        if *self.reject_writes.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("storage quota exceeded"),
            });
        }
        let json = serde_json::to_string(records).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.insert_raw(key, json);
        Ok(())
    }
}
