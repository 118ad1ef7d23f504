// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interactive route drawing for a single workout.
//!
//! Only one workout records at a time. Every click listener carries a
//! [`DrawingTicket`] naming the workout it was installed for, and a click is
//! accepted only while that workout is still the active one. Without this
//! check a listener left over from an earlier activation would add points
//! to the wrong route.

use crate::db::WorkoutDb;
use crate::error::Result;
use crate::models::{Coords, PathLine};
use crate::services::map::{MapView, MarkerStyle, PolylineStyle, RouteOverlay};

/// Identity captured by a click listener when drawing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingTicket {
    workout_id: String,
}

impl DrawingTicket {
    pub fn workout_id(&self) -> &str {
        &self.workout_id
    }
}

#[derive(Debug)]
struct Recording {
    origin: Coords,
    path: PathLine,
    /// Trail drawn since activation; present once a point was clicked
    trail: Option<RouteOverlay>,
}

impl Recording {
    fn erase<M: MapView + ?Sized>(&mut self, map: &mut M) {
        if let Some(trail) = self.trail.take() {
            trail.remove(map);
        }
    }
}

/// Route recorder: inactive, or recording points for one workout.
#[derive(Debug, Default)]
pub struct PathDrawingSession {
    recording: Option<Recording>,
}

impl PathDrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Workout currently receiving points.
    pub fn active_workout(&self) -> Option<&str> {
        self.recording.as_ref().map(|r| r.path.workout_id())
    }

    /// Points clicked since activation, not yet saved.
    pub fn unsaved_path(&self) -> Option<&PathLine> {
        self.recording.as_ref().map(|r| &r.path)
    }

    /// Start recording for `workout_id`, whose route begins at `origin`.
    ///
    /// Any unsaved points of the previously active workout are dropped and
    /// their trail is taken off the map. Saved routes are left alone.
    pub fn activate<M: MapView + ?Sized>(
        &mut self,
        workout_id: &str,
        origin: Coords,
        map: &mut M,
    ) -> DrawingTicket {
        if let Some(mut previous) = self.recording.take() {
            previous.erase(map);
            tracing::debug!(
                workout_id = previous.path.workout_id(),
                discarded = previous.path.len(),
                "Discarding unsaved path"
            );
        }

        self.recording = Some(Recording {
            origin,
            path: PathLine::new(workout_id),
            trail: None,
        });
        tracing::debug!(workout_id, "Path drawing started");

        DrawingTicket {
            workout_id: workout_id.to_string(),
        }
    }

    /// Handle a map click delivered to the listener holding `ticket`.
    ///
    /// Returns `false` (and changes nothing) when no workout is recording
    /// or the ticket belongs to a workout that is no longer active.
    pub fn record_click<M: MapView + ?Sized>(
        &mut self,
        ticket: &DrawingTicket,
        point: Coords,
        map: &mut M,
    ) -> bool {
        let Some(recording) = self.recording.as_mut() else {
            return false;
        };
        if recording.path.workout_id() != ticket.workout_id {
            tracing::debug!(
                ticket = %ticket.workout_id,
                active = recording.path.workout_id(),
                "Ignoring click from stale listener"
            );
            return false;
        }

        recording.path.push(point);

        let line = match recording.trail.take() {
            Some(trail) => {
                map.extend_polyline(trail.line, point);
                map.remove_marker(trail.end);
                trail.line
            }
            None => map.add_polyline(&[recording.origin, point], &PolylineStyle::default()),
        };
        recording.trail = Some(RouteOverlay {
            line,
            end: map.add_marker(point, MarkerStyle::PathEnd),
        });

        true
    }

    /// Persist the recorded route and stop recording.
    ///
    /// The stored route starts at the workout's own location. When no point
    /// was clicked the previously saved route is kept. The trail is erased
    /// once the route is stored; if the write fails the session keeps
    /// recording so nothing is lost.
    pub fn save<M: MapView + ?Sized>(
        &mut self,
        db: &WorkoutDb,
        map: &mut M,
    ) -> Result<Option<PathLine>> {
        let Some(recording) = self.recording.as_mut() else {
            return Ok(None);
        };

        if recording.path.is_empty() {
            tracing::debug!(
                workout_id = recording.path.workout_id(),
                "Nothing drawn, keeping saved path"
            );
            self.recording = None;
            return Ok(None);
        }

        let committed = recording.path.clone().anchored(recording.origin);
        db.save_path(&committed)?;
        tracing::info!(
            workout_id = committed.workout_id(),
            points = committed.len(),
            "Path saved"
        );

        recording.erase(map);
        self.recording = None;
        Ok(Some(committed))
    }

    /// Stop recording without saving and erase the trail.
    pub fn deactivate<M: MapView + ?Sized>(&mut self, map: &mut M) -> Option<PathLine> {
        self.recording.take().map(|mut recording| {
            recording.erase(map);
            recording.path
        })
    }

    /// Saved route of `workout_id`, starting at `origin`.
    ///
    /// A missing or unreadable route yields just the origin point.
    pub fn load_saved(db: &WorkoutDb, workout_id: &str, origin: Coords) -> PathLine {
        let saved = match db.load_path(workout_id) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(workout_id, error = %e, "Ignoring unreadable saved path");
                None
            }
        };
        saved
            .unwrap_or_else(|| PathLine::new(workout_id))
            .anchored(origin)
    }
}
