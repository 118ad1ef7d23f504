// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed key-value store: one JSON file per key in a directory.
//!
//! Key names are percent-encoded to form file names. Writes go to a
//! temporary file that is renamed over the target, so a crash mid-write
//! leaves the previous value intact.

use crate::db::kv::KvStore;
use crate::error::{AppError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = ".json";

/// Key-value store persisted under a directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        tracing::debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", urlencoding::encode(key), EXTENSION))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.file_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!("Failed to read {}: {}", key, e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let target = self.file_for(key);
        let tmp = self
            .dir
            .join(format!(".{}{}.tmp", urlencoding::encode(key), EXTENSION));

        fs::write(&tmp, value)
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", key, e)))?;
        fs::rename(&tmp, &target).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            AppError::Storage(format!("Failed to replace {}: {}", key, e))
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.file_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to remove {}: {}", key, e))),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            AppError::Storage(format!("Failed to list {}: {}", self.dir.display(), e))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::Storage(e.to_string()))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            // Skip in-flight temp files and anything we didn't write.
            if name.starts_with('.') {
                continue;
            }
            let Some(encoded) = name.strip_suffix(EXTENSION) else {
                continue;
            };
            match urlencoding::decode(encoded) {
                Ok(key) => keys.push(key.into_owned()),
                Err(e) => tracing::warn!(file = name, error = %e, "Skipping undecodable key"),
            }
        }
        keys.sort();
        Ok(keys)
    }
}
