// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout lifecycle: create, edit, delete, delete-all and sort.
//!
//! Handles the core workflow:
//! 1. Collect a location (map click) and form input
//! 2. Validate and build the workout record
//! 3. Persist the whole collection, then swap it into memory
//! 4. Keep one map marker per workout in sync
//!
//! UI state that used to live in ambient fields (form mode, sort
//! direction, selection, route drawing) is carried in an explicit
//! [`Session`] passed to every operation.

use crate::config::Config;
use crate::db::WorkoutDb;
use crate::error::{AppError, Result};
use crate::models::{Coords, PathLine, Workout, WorkoutInput};
use crate::services::drawing::{DrawingTicket, PathDrawingSession};
use crate::services::map::{
    ConfirmGate, MapView, MarkerStyle, PolylineStyle, RouteOverlay, ViewOptions,
};
use crate::services::store::{SortField, WorkoutStore};
use crate::time_utils::workout_id_at;
use chrono::{DateTime, Duration, Utc};

const CONFIRM_DELETE: &str = "Are you sure you want to delete this workout?";
const CONFIRM_DELETE_ALL: &str = "Are you sure you want to delete all workouts?";

/// What the workout form is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormMode {
    #[default]
    Idle,
    /// New workout at the clicked location
    Composing { at: Coords },
    /// Replacement for an existing workout
    Editing { id: String },
}

/// Transient UI state for one user session.
#[derive(Debug)]
pub struct Session {
    form: FormMode,
    /// One flag shared by every sort criterion
    sort_ascending: bool,
    selected: Option<String>,
    drawing: PathDrawingSession,
    /// Listener that currently receives map clicks for route drawing
    draw_listener: Option<DrawingTicket>,
    /// Saved route currently shown, with the workout it belongs to
    shown_route: Option<(String, RouteOverlay)>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            form: FormMode::Idle,
            sort_ascending: true,
            selected: None,
            drawing: PathDrawingSession::new(),
            draw_listener: None,
            shown_route: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormMode {
        &self.form
    }

    pub fn sort_ascending(&self) -> bool {
        self.sort_ascending
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn drawing(&self) -> &PathDrawingSession {
        &self.drawing
    }

    /// Workout whose saved route is on the map.
    pub fn shown_route(&self) -> Option<&str> {
        self.shown_route.as_ref().map(|(id, _)| id.as_str())
    }
}

/// Result of routing a map click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapClick {
    /// The point was added to the route being drawn
    Drawn,
    /// Dropped: a stale drawing listener received it, or an edit is in
    /// progress
    Ignored,
    /// The workout form opened at the clicked location
    FormOpened,
}

/// Orchestrates every mutation of the workout collection.
pub struct LifecycleController<M: MapView, C: ConfirmGate> {
    db: WorkoutDb,
    store: WorkoutStore,
    map: M,
    confirm: C,
    zoom: u8,
    map_ready: bool,
}

impl<M: MapView, C: ConfirmGate> LifecycleController<M, C> {
    /// Load saved workouts and wire up the collaborators.
    ///
    /// Missing or unreadable saved data starts an empty collection.
    pub fn open(db: WorkoutDb, map: M, confirm: C, config: &Config) -> Self {
        let store = load_store(&db);
        Self {
            db,
            store,
            map,
            confirm,
            zoom: config.map_zoom,
            map_ready: false,
        }
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn workouts(&self) -> &[Workout] {
        self.store.workouts()
    }

    pub fn db(&self) -> &WorkoutDb {
        &self.db
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    // ─── Startup ─────────────────────────────────────────────────

    /// Handle the one-shot geolocation result.
    ///
    /// On success the map is centred on the user and every workout gets
    /// its marker. Failure is reported to the user; workouts stay usable.
    pub fn on_position(&mut self, position: std::result::Result<Coords, String>) -> Result<()> {
        let here = position.map_err(|reason| {
            tracing::warn!(reason = %reason, "Geolocation failed");
            AppError::Geolocation(reason)
        })?;

        self.map.set_view(here, self.zoom, ViewOptions::instant());
        self.map_ready = true;
        self.render_all_markers();
        tracing::info!(markers = self.store.len(), "Map ready");
        Ok(())
    }

    /// Route a map click: to the route being drawn if there is one,
    /// otherwise open the form at that point.
    pub fn handle_map_click(&mut self, session: &mut Session, at: Coords) -> MapClick {
        if let Some(ticket) = session.draw_listener.clone() {
            return if self.draw_click(session, &ticket, at) {
                MapClick::Drawn
            } else {
                MapClick::Ignored
            };
        }

        if self.request_new(session, at) {
            MapClick::FormOpened
        } else {
            MapClick::Ignored
        }
    }

    // ─── Create / Edit ───────────────────────────────────────────

    /// Open the form for a new workout at `at`. Returns whether it opened;
    /// the request is ignored while an edit is in progress.
    pub fn request_new(&mut self, session: &mut Session, at: Coords) -> bool {
        if let FormMode::Editing { id } = &session.form {
            tracing::debug!(workout_id = %id, "Edit in progress, ignoring new location");
            return false;
        }
        session.form = FormMode::Composing { at };
        true
    }

    /// Open the form pre-filled with workout `id`.
    ///
    /// Returns `None` (and leaves the session alone) for an unknown id.
    pub fn request_edit(&mut self, session: &mut Session, id: &str) -> Option<WorkoutInput> {
        let Ok(workout) = self.store.find(id) else {
            tracing::debug!(workout_id = id, "Edit requested for unknown workout");
            return None;
        };
        let prefill = WorkoutInput::from_workout(workout);
        session.form = FormMode::Editing { id: id.to_string() };
        Some(prefill)
    }

    /// Submit the form.
    ///
    /// Returns the stored workout, or `None` when no form was open or the
    /// workout being edited no longer exists. Validation failures leave the
    /// form open and the collection untouched.
    pub fn submit(&mut self, session: &mut Session, input: &WorkoutInput) -> Result<Option<Workout>> {
        match session.form.clone() {
            FormMode::Idle => {
                tracing::debug!("Submit without an open form");
                Ok(None)
            }
            FormMode::Composing { at } => {
                let workout = self.create(at, input)?;
                session.form = FormMode::Idle;
                Ok(Some(workout))
            }
            FormMode::Editing { id } => {
                let edited = self.edit(&id, input)?;
                session.form = FormMode::Idle;
                Ok(edited)
            }
        }
    }

    fn create(&mut self, at: Coords, input: &WorkoutInput) -> Result<Workout> {
        let details = input.validate()?;
        let now = Utc::now();
        let workout = Workout::with_identity(
            self.fresh_id(now),
            now,
            at,
            input.distance,
            input.duration,
            details,
        )?;

        let mut next = self.store.clone();
        next.add(workout.clone());
        self.commit(next)?;
        self.render_marker(&workout);

        tracing::info!(
            workout_id = workout.id(),
            kind = %workout.kind(),
            total = self.store.len(),
            "Workout created"
        );
        Ok(workout)
    }

    fn edit(&mut self, id: &str, input: &WorkoutInput) -> Result<Option<Workout>> {
        let details = input.validate()?;
        let Ok(original) = self.store.find(id) else {
            tracing::debug!(workout_id = id, "Edited workout no longer exists");
            return Ok(None);
        };
        let replacement = original.revised(input.distance, input.duration, details)?;

        let mut next = self.store.clone();
        next.replace(id, replacement.clone())?;
        self.commit(next)?;
        self.render_marker(&replacement);

        tracing::info!(workout_id = id, kind = %replacement.kind(), "Workout edited");
        Ok(Some(replacement))
    }

    /// Timestamp-derived id, bumped past ids already in the collection.
    fn fresh_id(&self, now: DateTime<Utc>) -> String {
        let mut at = now;
        loop {
            let id = workout_id_at(at);
            if !self.store.contains(&id) {
                return id;
            }
            at += Duration::milliseconds(1);
        }
    }

    // ─── Delete ──────────────────────────────────────────────────

    /// Delete one workout, its marker and its saved route after
    /// confirmation. Returns whether anything was deleted.
    pub fn delete(&mut self, session: &mut Session, id: &str) -> Result<bool> {
        if !self.confirm.confirm(CONFIRM_DELETE) {
            return Ok(false);
        }

        let mut next = self.store.clone();
        let removed = match next.remove(id) {
            Ok(removed) => removed,
            Err(e) if e.is_silent() => {
                tracing::debug!(workout_id = id, "Delete of unknown workout ignored");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        self.commit(next)?;

        if let Some(marker) = self.store.take_marker(id) {
            self.map.remove_marker(marker);
        }
        if let Err(e) = self.db.delete_path(id) {
            tracing::warn!(workout_id = id, error = %e, "Failed to delete saved path");
        }
        self.forget(session, id);
        self.map
            .set_view(removed.coords(), self.zoom, ViewOptions::animated());

        tracing::info!(workout_id = id, remaining = self.store.len(), "Workout deleted");
        Ok(true)
    }

    /// Delete every workout, marker and saved route after confirmation.
    /// Returns the number of workouts removed.
    pub fn delete_all(&mut self, session: &mut Session) -> Result<usize> {
        if !self.confirm.confirm(CONFIRM_DELETE_ALL) {
            return Ok(0);
        }

        let paths = self.db.delete_all_paths()?;
        self.db.clear_workouts()?;

        for marker in self.store.take_all_markers() {
            self.map.remove_marker(marker);
        }
        let removed = self.store.remove_all().len();
        self.reset_session(session);

        tracing::info!(removed, paths, "All workouts deleted");
        Ok(removed)
    }

    // ─── Sort ────────────────────────────────────────────────────

    /// Flip the shared sort direction and reorder by `field`.
    ///
    /// The flag starts out ascending and flips before sorting, so the first
    /// sort is descending and sorting twice restores the previous order of
    /// distinct values.
    pub fn sort(&mut self, session: &mut Session, field: SortField) -> Result<()> {
        let ascending = !session.sort_ascending;

        let mut next = self.store.clone();
        next.sort_by(field, ascending);
        self.commit(next)?;
        session.sort_ascending = ascending;

        tracing::debug!(?field, ascending, "Workouts sorted");
        Ok(())
    }

    // ─── Selection & Paths ───────────────────────────────────────

    /// Focus workout `id`: pan to it, count the selection and show its
    /// saved route in place of any route shown before. Returns the route,
    /// or `None` for an unknown id.
    pub fn select(&mut self, session: &mut Session, id: &str) -> Option<PathLine> {
        let Ok(workout) = self.store.find_mut(id) else {
            tracing::debug!(workout_id = id, "Selected workout no longer exists");
            return None;
        };
        workout.click();
        let origin = workout.coords();

        self.map.set_view(origin, self.zoom, ViewOptions::animated());
        session.selected = Some(id.to_string());

        let path = PathDrawingSession::load_saved(&self.db, id, origin);
        self.show_route(session, &path);
        Some(path)
    }

    /// Start drawing a route for workout `id`. Subsequent map clicks go to
    /// the route until it is saved. Returns `None` for an unknown id.
    pub fn start_drawing(&mut self, session: &mut Session, id: &str) -> Option<DrawingTicket> {
        let Ok(workout) = self.store.find(id) else {
            tracing::debug!(workout_id = id, "Drawing requested for unknown workout");
            return None;
        };
        let ticket = session.drawing.activate(id, workout.coords(), &mut self.map);
        session.draw_listener = Some(ticket.clone());
        session.form = FormMode::Idle;
        Some(ticket)
    }

    /// Deliver a click to the drawing listener identified by `ticket`.
    pub fn draw_click(&mut self, session: &mut Session, ticket: &DrawingTicket, at: Coords) -> bool {
        let accepted = session.drawing.record_click(ticket, at, &mut self.map);
        if accepted {
            session.form = FormMode::Idle;
        }
        accepted
    }

    /// Save the route being drawn, show it as the workout's route, and
    /// hand map clicks back to the form.
    pub fn save_path(&mut self, session: &mut Session) -> Result<Option<PathLine>> {
        let saved = session.drawing.save(&self.db, &mut self.map)?;
        session.draw_listener = None;
        if let Some(path) = &saved {
            self.show_route(session, path);
        }
        Ok(saved)
    }

    // ─── Cancel ──────────────────────────────────────────────────

    /// Drop every pending change and reload workouts from storage.
    pub fn cancel(&mut self, session: &mut Session) {
        self.reset_session(session);

        for marker in self.store.take_all_markers() {
            self.map.remove_marker(marker);
        }
        self.store = load_store(&self.db);
        if self.map_ready {
            self.render_all_markers();
        }
        tracing::debug!(workouts = self.store.len(), "Session reset");
    }

    // ─── Internals ───────────────────────────────────────────────

    /// Persist `next`, then make it the live collection. A failed write
    /// leaves the live collection untouched.
    fn commit(&mut self, next: WorkoutStore) -> Result<()> {
        let payload = next.serialize()?;
        self.db.save_workouts(&payload)?;
        self.store = next;
        Ok(())
    }

    /// Forget everything in `session` that refers to `id`.
    fn forget(&mut self, session: &mut Session, id: &str) {
        if session.selected.as_deref() == Some(id) {
            session.selected = None;
        }
        if session.drawing.active_workout() == Some(id) {
            session.drawing.deactivate(&mut self.map);
            session.draw_listener = None;
        }
        if matches!(&session.shown_route, Some((shown, _)) if shown == id) {
            self.hide_route(session);
        }
        if matches!(&session.form, FormMode::Editing { id: editing } if editing == id) {
            session.form = FormMode::Idle;
        }
    }

    /// Take the session's overlays off the map and start a fresh session.
    fn reset_session(&mut self, session: &mut Session) {
        session.drawing.deactivate(&mut self.map);
        self.hide_route(session);
        *session = Session::default();
    }

    /// Draw `path` as the shown route, replacing the previous one. A route
    /// with only its origin draws nothing.
    fn show_route(&mut self, session: &mut Session, path: &PathLine) {
        self.hide_route(session);
        let Some(end) = path.last().filter(|_| path.len() > 1) else {
            return;
        };
        let overlay = RouteOverlay {
            line: self.map.add_polyline(path.points(), &PolylineStyle::default()),
            end: self.map.add_marker(end, MarkerStyle::PathEnd),
        };
        session.shown_route = Some((path.workout_id().to_string(), overlay));
    }

    fn hide_route(&mut self, session: &mut Session) {
        if let Some((_, overlay)) = session.shown_route.take() {
            overlay.remove(&mut self.map);
        }
    }

    /// Show the marker for `workout`, removing any previous one first.
    fn render_marker(&mut self, workout: &Workout) {
        if !self.map_ready {
            return;
        }
        if let Some(old) = self.store.take_marker(workout.id()) {
            self.map.remove_marker(old);
        }
        let handle = self.map.add_marker(
            workout.coords(),
            MarkerStyle::Popup {
                content: workout.popup_content(),
                class_name: format!("{}-popup", workout.kind()),
            },
        );
        self.store.set_marker(workout.id(), handle);
    }

    fn render_all_markers(&mut self) {
        let workouts = self.store.workouts().to_vec();
        for workout in &workouts {
            self.render_marker(workout);
        }
    }
}

/// Restore the saved collection, falling back to empty.
fn load_store(db: &WorkoutDb) -> WorkoutStore {
    let payload = match db.load_workouts() {
        Ok(Some(payload)) => payload,
        Ok(None) => return WorkoutStore::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read saved workouts, starting empty");
            return WorkoutStore::new();
        }
    };

    match WorkoutStore::restore(&payload) {
        Ok(workouts) => {
            tracing::info!(count = workouts.len(), "Restored workouts");
            WorkoutStore::from_workouts(workouts)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Saved workouts unreadable, starting empty");
            WorkoutStore::new()
        }
    }
}
