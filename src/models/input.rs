// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout form input and its validation policy.

use crate::error::{AppError, Result};
use crate::models::workout::{Workout, WorkoutDetails, WorkoutKind};

/// Raw values collected by the workout form.
///
/// Only the field matching `kind` is consulted; the other one is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutInput {
    pub kind: WorkoutKind,
    pub distance: f64,
    pub duration: f64,
    pub cadence: Option<f64>,
    pub elevation_gain: Option<f64>,
}

impl WorkoutInput {
    pub fn running(distance: f64, duration: f64, cadence: f64) -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance,
            duration,
            cadence: Some(cadence),
            elevation_gain: None,
        }
    }

    pub fn cycling(distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            distance,
            duration,
            cadence: None,
            elevation_gain: Some(elevation_gain),
        }
    }

    /// Parse the text fields of the form.
    ///
    /// Empty or unparsable numbers become `NaN` and are rejected later by
    /// [`WorkoutInput::validate`]; only an unknown type fails here.
    pub fn from_form(
        kind: &str,
        distance: &str,
        duration: &str,
        cadence: &str,
        elevation_gain: &str,
    ) -> Result<Self> {
        Ok(Self {
            kind: kind.parse()?,
            distance: parse_number(distance),
            duration: parse_number(duration),
            cadence: Some(parse_number(cadence)),
            elevation_gain: Some(parse_number(elevation_gain)),
        })
    }

    /// Values used to pre-fill the form when editing `workout`.
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            kind: workout.kind(),
            distance: workout.distance(),
            duration: workout.duration(),
            cadence: workout.cadence(),
            elevation_gain: workout.elevation_gain(),
        }
    }

    /// Apply the validation policy shared by create and edit.
    ///
    /// Distance and duration must be finite and positive. Runs also need a
    /// finite positive cadence. Rides only need a finite elevation gain;
    /// zero and negative climbs are accepted.
    pub fn validate(&self) -> Result<WorkoutDetails> {
        require_positive("distance", self.distance)?;
        require_positive("duration", self.duration)?;

        match self.kind {
            WorkoutKind::Running => {
                let cadence = self.cadence.unwrap_or(f64::NAN);
                require_positive("cadence", cadence)?;
                Ok(WorkoutDetails::Running { cadence })
            }
            WorkoutKind::Cycling => {
                let elevation_gain = self.elevation_gain.unwrap_or(f64::NAN);
                if !elevation_gain.is_finite() {
                    return Err(AppError::Validation(
                        "elevation gain must be a number".to_string(),
                    ));
                }
                Ok(WorkoutDetails::Cycling { elevation_gain })
            }
        }
    }
}

fn parse_number(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be a positive number",
            field
        )))
    }
}
