// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory workout collection and its JSON round-trip.

use crate::error::{AppError, Result};
use crate::models::{StoredWorkout, Workout};
use crate::services::map::MarkerHandle;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

/// Field a workout list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Distance,
    Duration,
    /// Runs only
    Cadence,
    /// Rides only
    ElevationGain,
}

impl SortField {
    fn value(self, workout: &Workout) -> Option<f64> {
        match self {
            SortField::Distance => Some(workout.distance()),
            SortField::Duration => Some(workout.duration()),
            SortField::Cadence => workout.cadence(),
            SortField::ElevationGain => workout.elevation_gain(),
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "distance" => Ok(SortField::Distance),
            "duration" => Ok(SortField::Duration),
            "cadence" => Ok(SortField::Cadence),
            "elevation" | "elevationGain" => Ok(SortField::ElevationGain),
            other => Err(AppError::Validation(format!(
                "unknown sort criterion {:?}",
                other
            ))),
        }
    }
}

/// Ordered workouts plus the map marker currently shown for each id.
///
/// Only the lifecycle controller writes to a store; everything else reads.
#[derive(Debug, Clone, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
    markers: HashMap<String, MarkerHandle>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_workouts(workouts: Vec<Workout>) -> Self {
        Self {
            workouts,
            markers: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn ids(&self) -> Vec<&str> {
        self.workouts.iter().map(Workout::id).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.workouts.iter().any(|w| w.id() == id)
    }

    /// Append a workout. Ids are not checked for duplicates here.
    pub fn add(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    /// Swap the workout `id` for `replacement` in one step.
    ///
    /// The original is removed and the replacement appended, so the store
    /// never holds both. Returns the original.
    pub fn replace(&mut self, id: &str, replacement: Workout) -> Result<Workout> {
        let original = self.remove(id)?;
        self.workouts.push(replacement);
        Ok(original)
    }

    /// Remove the first workout with `id`.
    pub fn remove(&mut self, id: &str) -> Result<Workout> {
        let index = self
            .workouts
            .iter()
            .position(|w| w.id() == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        Ok(self.workouts.remove(index))
    }

    /// Remove every workout, returning them in order.
    pub fn remove_all(&mut self) -> Vec<Workout> {
        std::mem::take(&mut self.workouts)
    }

    pub fn find(&self, id: &str) -> Result<&Workout> {
        self.workouts
            .iter()
            .find(|w| w.id() == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    pub fn find_mut(&mut self, id: &str) -> Result<&mut Workout> {
        self.workouts
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    /// Reorder by `field`. Ties keep their current relative order.
    ///
    /// Workouts without the field (rides when sorting by cadence, runs when
    /// sorting by elevation) go after all workouts that have it, in either
    /// direction.
    pub fn sort_by(&mut self, field: SortField, ascending: bool) {
        self.workouts
            .sort_by(|a, b| match (field.value(a), field.value(b)) {
                (Some(x), Some(y)) => {
                    let ordering = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                    if ascending {
                        ordering
                    } else {
                        ordering.reverse()
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
    }

    // ─── Markers ─────────────────────────────────────────────────

    pub fn marker(&self, id: &str) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    /// Record the marker shown for `id`, returning the one it displaced.
    pub fn set_marker(&mut self, id: &str, handle: MarkerHandle) -> Option<MarkerHandle> {
        self.markers.insert(id.to_string(), handle)
    }

    pub fn take_marker(&mut self, id: &str) -> Option<MarkerHandle> {
        self.markers.remove(id)
    }

    pub fn take_all_markers(&mut self) -> Vec<MarkerHandle> {
        self.markers.drain().map(|(_, handle)| handle).collect()
    }

    // ─── Serialization ───────────────────────────────────────────

    /// JSON array of every workout, derived fields included.
    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string(&self.workouts)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode workouts: {}", e)))
    }

    /// Rebuild workouts from a serialized array.
    ///
    /// Each record is reconstructed through the constructor of its `type`.
    /// Records that cannot be rebuilt are skipped with a warning; a payload
    /// that is not an array at all is a `Restore` error. A literal `null`
    /// means no saved workouts.
    pub fn restore(payload: &str) -> Result<Vec<Workout>> {
        let values: Option<Vec<serde_json::Value>> =
            serde_json::from_str(payload).map_err(|e| AppError::Restore(e.to_string()))?;
        let Some(values) = values else {
            return Ok(Vec::new());
        };

        let mut workouts = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            let restored = serde_json::from_value::<StoredWorkout>(value)
                .map_err(|e| AppError::Restore(e.to_string()))
                .and_then(Workout::try_from);
            match restored {
                Ok(workout) => workouts.push(workout),
                Err(e) => tracing::warn!(index, error = %e, "Skipping unreadable workout"),
            }
        }
        Ok(workouts)
    }
}
