// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file store, durable across process restarts.
//!
//! The whole map is held in memory and rewritten on every mutation. The file
//! is created with owner-only permissions on Unix since it holds bearer
//! tokens in plain text.

use super::KeyValueStore;
use crate::error::{AppError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File-backed key-value store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                AppError::Storage(format!("Cannot read '{}': {}", path.display(), e))
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    AppError::Storage(format!("Corrupted store '{}': {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), entries = cache.len(), "Opened session store");

        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Get the file path used by this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| AppError::Storage("Store lock poisoned".to_string()))?;
        mutate(&mut cache);
        self.save_to_disk(&cache)
    }

    fn save_to_disk(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Storage(format!("Failed to encode store: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Storage(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        fs::write(&self.path, contents).map_err(|e| {
            AppError::Storage(format!("Failed to write '{}': {}", self.path.display(), e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AppError::Storage(format!(
                    "Failed to set permissions for '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|cache| {
            cache.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|cache| {
            cache.remove(key);
        })
    }
}
