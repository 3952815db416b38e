// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! File-backed key-value store.
//!
//! One JSON document on disk, loaded once at open, rewritten through a
//! temp-file rename on every mutation. This is the durable store the CLI
//! uses; a missing or corrupt file degrades to an empty store rather than
//! failing the caller.

use crate::store::{KeyValue, StoreError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSON-file-backed [`KeyValue`] implementation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let map = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e,
                        "session file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            map: Mutex::new(map),
        }
    }

    fn persist(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        let contents =
            serde_json::to_string_pretty(map).map_err(|e| StoreError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, contents).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.map
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValue for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.lock();
        map.insert(key.to_string(), value.to_string());
        self.persist(&map)
    }

    fn remove(&self, key: &str) {
        let mut map = self.lock();
        if map.remove(key).is_some() {
            if let Err(e) = self.persist(&map) {
                tracing::warn!(key, error = %e, "failed to persist key removal");
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }
}
