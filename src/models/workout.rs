// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout record model: runs and cycling trips anchored to a map location.
//!
//! Derived metrics (pace, speed) and the description are computed once by
//! the constructor. Persisted records go through [`StoredWorkout`], and
//! restoring one always re-runs the constructor for its `type`, so derived
//! values found in saved data are never trusted.

use crate::error::{AppError, Result};
use crate::time_utils::{month_day, workout_id_at};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A map location. Persisted as a `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

// geo uses x = longitude, y = latitude.
impl From<Coords> for geo::Coord<f64> {
    fn from(coords: Coords) -> Self {
        geo::Coord {
            x: coords.lng,
            y: coords.lat,
        }
    }
}

impl From<geo::Coord<f64>> for Coords {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

impl From<Coords> for geo::Point<f64> {
    fn from(coords: Coords) -> Self {
        geo::Point::new(coords.lng, coords.lat)
    }
}

/// Workout type discriminant, persisted as `"running"` / `"cycling"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn label(self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃🏻‍♂️",
            WorkoutKind::Cycling => "🚴🏻",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(AppError::Validation(format!(
                "unknown workout type {:?}",
                other
            ))),
        }
    }
}

/// Type-specific input of a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutDetails {
    /// Steps per minute
    Running { cadence: f64 },
    /// Meters climbed; zero or negative is allowed
    Cycling { elevation_gain: f64 },
}

impl WorkoutDetails {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// One logged activity.
///
/// Fields are private: `id`, `created_at` and `coords` never change once
/// assigned, and the derived metric only exists through the constructor.
/// The selection counter is the only in-place mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "StoredWorkout")]
pub struct Workout {
    id: String,
    created_at: DateTime<Utc>,
    coords: Coords,
    /// Kilometers
    distance: f64,
    /// Minutes
    duration: f64,
    details: WorkoutDetails,
    /// Pace (min/km) for runs, speed (km/h) for rides
    metric: f64,
    description: String,
    clicks: u32,
}

impl Workout {
    /// Create a run at `coords`, stamped with the current time.
    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64) -> Result<Self> {
        Self::new(
            coords,
            distance,
            duration,
            WorkoutDetails::Running { cadence },
        )
    }

    /// Create a ride at `coords`, stamped with the current time.
    pub fn cycling(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self> {
        Self::new(
            coords,
            distance,
            duration,
            WorkoutDetails::Cycling { elevation_gain },
        )
    }

    /// Create a workout of either type, stamped with the current time.
    pub fn new(
        coords: Coords,
        distance: f64,
        duration: f64,
        details: WorkoutDetails,
    ) -> Result<Self> {
        let now = Utc::now();
        Self::with_identity(workout_id_at(now), now, coords, distance, duration, details)
    }

    /// Create a workout with an explicit id and creation time.
    ///
    /// Used when an existing record is rebuilt (edit, restore). Fails with
    /// `Validation` when distance or duration is not a positive finite
    /// number, since both are divisors of the derived metrics.
    pub fn with_identity(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        details: WorkoutDetails,
    ) -> Result<Self> {
        ensure_positive("distance", distance)?;
        ensure_positive("duration", duration)?;

        let metric = match details {
            WorkoutDetails::Running { .. } => duration / distance,
            WorkoutDetails::Cycling { .. } => distance / (duration / 60.0),
        };
        let description = format!("{} on {}", details.kind().label(), month_day(created_at));

        Ok(Self {
            id: id.into(),
            created_at,
            coords,
            distance,
            duration,
            details,
            metric,
            description,
            clicks: 0,
        })
    }

    /// Build the replacement for an edit: same id, creation time,
    /// location and selection count, new measurements (type may change).
    pub fn revised(&self, distance: f64, duration: f64, details: WorkoutDetails) -> Result<Self> {
        let mut revised = Self::with_identity(
            self.id.clone(),
            self.created_at,
            self.coords,
            distance,
            duration,
            details,
        )?;
        revised.clicks = self.clicks;
        Ok(revised)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    pub fn details(&self) -> WorkoutDetails {
        self.details
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of times the workout was selected.
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Record a selection.
    pub fn click(&mut self) {
        self.clicks += 1;
    }

    pub fn cadence(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running { cadence } => Some(cadence),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { elevation_gain } => Some(elevation_gain),
            WorkoutDetails::Running { .. } => None,
        }
    }

    /// Minutes per kilometer (runs only).
    pub fn pace(&self) -> Option<f64> {
        matches!(self.details, WorkoutDetails::Running { .. }).then_some(self.metric)
    }

    /// Kilometers per hour (rides only).
    pub fn speed(&self) -> Option<f64> {
        matches!(self.details, WorkoutDetails::Cycling { .. }).then_some(self.metric)
    }

    /// Popup text shown on the workout's map marker.
    pub fn popup_content(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }

    /// One-line summary for list views.
    pub fn summary(&self) -> String {
        let specific = match self.details {
            WorkoutDetails::Running { cadence } => {
                format!("{:.1} min/km · {} spm", self.metric, cadence)
            }
            WorkoutDetails::Cycling { elevation_gain } => {
                format!("{:.1} km/h · {} m", self.metric, elevation_gain)
            }
        };
        format!(
            "{} · {} km · {} min · {}",
            self.popup_content(),
            self.distance,
            self.duration,
            specific
        )
    }
}

fn ensure_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be a positive number, got {}",
            field, value
        )))
    }
}

/// Flat persisted shape of a workout (the `workouts` array element).
///
/// Derived fields are written for readers of the raw data but ignored on
/// restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWorkout {
    pub id: String,
    pub date: DateTime<Utc>,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default)]
    pub clicks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default)]
    pub description: String,
}

impl From<Workout> for StoredWorkout {
    fn from(workout: Workout) -> Self {
        Self {
            cadence: workout.cadence(),
            pace: workout.pace(),
            elevation_gain: workout.elevation_gain(),
            speed: workout.speed(),
            kind: workout.kind(),
            id: workout.id,
            date: workout.created_at,
            coords: workout.coords,
            distance: workout.distance,
            duration: workout.duration,
            clicks: workout.clicks,
            description: workout.description,
        }
    }
}

impl TryFrom<StoredWorkout> for Workout {
    type Error = AppError;

    /// Rebuild through the constructor of the stored `type`.
    fn try_from(stored: StoredWorkout) -> Result<Self> {
        let details = match stored.kind {
            WorkoutKind::Running => WorkoutDetails::Running {
                cadence: stored.cadence.ok_or_else(|| {
                    AppError::Restore(format!("running workout {} has no cadence", stored.id))
                })?,
            },
            WorkoutKind::Cycling => WorkoutDetails::Cycling {
                elevation_gain: stored.elevation_gain.ok_or_else(|| {
                    AppError::Restore(format!(
                        "cycling workout {} has no elevation gain",
                        stored.id
                    ))
                })?,
            },
        };

        let id = stored.id;
        let mut workout = Workout::with_identity(
            id.clone(),
            stored.date,
            stored.coords,
            stored.distance,
            stored.duration,
            details,
        )
        .map_err(|e| AppError::Restore(format!("workout {}: {}", id, e)))?;
        workout.clicks = stored.clicks;
        Ok(workout)
    }
}
