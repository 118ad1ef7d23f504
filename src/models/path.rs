// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hand-drawn route associated with one workout.

use crate::models::workout::Coords;
use geo::{Distance, Haversine, LineString, Point};

/// Google polyline precision (5 decimal places).
const POLYLINE_PRECISION: u32 = 5;

/// Ordered route points for a single workout.
///
/// Stored separately from the workout record under `path-<workout id>`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathLine {
    workout_id: String,
    points: Vec<Coords>,
}

impl PathLine {
    pub fn new(workout_id: impl Into<String>) -> Self {
        Self {
            workout_id: workout_id.into(),
            points: Vec::new(),
        }
    }

    pub fn from_points(workout_id: impl Into<String>, points: Vec<Coords>) -> Self {
        Self {
            workout_id: workout_id.into(),
            points,
        }
    }

    pub fn workout_id(&self) -> &str {
        &self.workout_id
    }

    pub fn points(&self) -> &[Coords] {
        &self.points
    }

    pub fn push(&mut self, point: Coords) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Coords> {
        self.points.last().copied()
    }

    /// Make `origin` the first point unless it already is.
    pub fn anchored(mut self, origin: Coords) -> Self {
        if self.points.first() != Some(&origin) {
            self.points.insert(0, origin);
        }
        self
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        self.points.iter().map(|p| geo::Coord::from(*p)).collect()
    }

    /// Great-circle length of the route in kilometers.
    pub fn length_km(&self) -> f64 {
        let meters: f64 = self
            .points
            .windows(2)
            .map(|pair| Haversine.distance(Point::from(pair[0]), Point::from(pair[1])))
            .sum();
        meters / 1000.0
    }

    /// Encode the route as a Google polyline string.
    pub fn encode(&self) -> Result<String, PathError> {
        polyline::encode_coordinates(
            self.points.iter().map(|p| geo::Coord::from(*p)),
            POLYLINE_PRECISION,
        )
        .map_err(|e| PathError::PolylineError(e.to_string()))
    }

    /// Decode a Google polyline string into a route for `workout_id`.
    pub fn decode(workout_id: impl Into<String>, encoded: &str) -> Result<Self, PathError> {
        let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
            .map_err(|e| PathError::PolylineError(e.to_string()))?;
        Ok(Self::from_points(
            workout_id,
            line.0.into_iter().map(Coords::from).collect(),
        ))
    }
}

/// Errors from path conversions.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Failed to convert polyline: {0}")]
    PolylineError(String),
}
