// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed persistence operations for workouts and drawn paths.
//!
//! Provides high-level operations for:
//! - Workouts (the serialized `workouts` array)
//! - Paths (one `path-<workout id>` entry per drawn route)

use crate::db::keys;
use crate::db::kv::{KvStore, MemoryKvStore};
use crate::error::{AppError, Result};
use crate::models::{Coords, PathLine};
use std::sync::Arc;

/// Workout database over a shared key-value store.
#[derive(Clone)]
pub struct WorkoutDb {
    kv: Arc<dyn KvStore>,
}

impl WorkoutDb {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Database backed by a fresh in-memory store (tests, previews).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKvStore::new()))
    }

    /// The underlying store.
    pub fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Raw `workouts` payload, if one was ever saved.
    pub fn load_workouts(&self) -> Result<Option<String>> {
        self.kv.get(keys::WORKOUTS)
    }

    /// Overwrite the `workouts` payload.
    pub fn save_workouts(&self, payload: &str) -> Result<()> {
        self.kv.set(keys::WORKOUTS, payload)
    }

    pub fn clear_workouts(&self) -> Result<()> {
        self.kv.remove(keys::WORKOUTS)
    }

    // ─── Path Operations ─────────────────────────────────────────

    /// Saved route for a workout, exactly as stored (no origin added).
    pub fn load_path(&self, workout_id: &str) -> Result<Option<PathLine>> {
        let Some(raw) = self.kv.get(&keys::path(workout_id))? else {
            return Ok(None);
        };

        // Browser storage returns the literal "null" for a stored null.
        let points: Option<Vec<Coords>> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Restore(format!("path for workout {}: {}", workout_id, e))
        })?;

        Ok(points.map(|points| PathLine::from_points(workout_id, points)))
    }

    /// Store a route under its workout's path key.
    pub fn save_path(&self, path: &PathLine) -> Result<()> {
        let payload = serde_json::to_string(path.points())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode path: {}", e)))?;
        self.kv.set(&keys::path(path.workout_id()), &payload)
    }

    pub fn delete_path(&self, workout_id: &str) -> Result<()> {
        self.kv.remove(&keys::path(workout_id))
    }

    /// Ids of every workout that has a saved path, including orphans.
    pub fn path_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .kv
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(keys::PATH_PREFIX).map(str::to_string))
            .collect())
    }

    /// Remove every saved path. Returns the number removed.
    pub fn delete_all_paths(&self) -> Result<usize> {
        let ids = self.path_ids()?;
        for id in &ids {
            self.delete_path(id)?;
        }
        tracing::debug!(count = ids.len(), "Deleted saved paths");
        Ok(ids.len())
    }
}
