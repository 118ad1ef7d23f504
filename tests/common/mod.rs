// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mapty_tracker::config::Config;
use mapty_tracker::db::{KvStore, MemoryKvStore, WorkoutDb};
use mapty_tracker::error::{AppError, Result};
use mapty_tracker::models::{Coords, Workout, WorkoutInput};
use mapty_tracker::services::{
    ConfirmGate, LifecycleController, MapView, MarkerHandle, MarkerStyle, PolylineHandle,
    PolylineStyle, Session, ViewOptions,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub type TestApp = LifecycleController<RecordingMap, ScriptedConfirm>;

/// Where the user is when the map loads.
#[allow(dead_code)]
pub const HOME: Coords = Coords {
    lat: 40.4168,
    lng: -3.7038,
};

/// A map call as seen by the recording double.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    SetView {
        center: Coords,
        zoom: u8,
        animate: bool,
    },
    AddMarker {
        handle: MarkerHandle,
        at: Coords,
        style: MarkerStyle,
    },
    RemoveMarker(MarkerHandle),
    AddPolyline {
        handle: PolylineHandle,
        points: Vec<Coords>,
    },
    ExtendPolyline {
        handle: PolylineHandle,
        point: Coords,
    },
    RemovePolyline(PolylineHandle),
}

/// Map double that records every call and tracks what is still shown.
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub calls: Vec<MapCall>,
    next_handle: u64,
    live_markers: HashSet<MarkerHandle>,
    live_polylines: HashSet<PolylineHandle>,
}

#[allow(dead_code)]
impl RecordingMap {
    /// Workout markers (with popups) currently on the map.
    pub fn popup_markers(&self) -> Vec<(MarkerHandle, String)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MapCall::AddMarker {
                    handle,
                    style: MarkerStyle::Popup { content, .. },
                    ..
                } if self.live_markers.contains(handle) => Some((*handle, content.clone())),
                _ => None,
            })
            .collect()
    }

    /// Route end pins currently on the map.
    pub fn path_end_markers(&self) -> Vec<Coords> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MapCall::AddMarker {
                    handle,
                    at,
                    style: MarkerStyle::PathEnd,
                } if self.live_markers.contains(handle) => Some(*at),
                _ => None,
            })
            .collect()
    }

    /// Points of every polyline still on the map, as first drawn.
    pub fn live_polylines(&self) -> Vec<Vec<Coords>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MapCall::AddPolyline { handle, points } if self.live_polylines.contains(handle) => {
                    Some(points.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn last_view(&self) -> Option<(Coords, u8, bool)> {
        self.calls.iter().rev().find_map(|call| match call {
            MapCall::SetView {
                center,
                zoom,
                animate,
            } => Some((*center, *zoom, *animate)),
            _ => None,
        })
    }

    pub fn polylines(&self) -> Vec<Vec<Coords>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MapCall::AddPolyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn extensions(&self) -> Vec<Coords> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MapCall::ExtendPolyline { point, .. } => Some(*point),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl MapView for RecordingMap {
    fn set_view(&mut self, center: Coords, zoom: u8, options: ViewOptions) {
        self.calls.push(MapCall::SetView {
            center,
            zoom,
            animate: options.animate,
        });
    }

    fn add_marker(&mut self, at: Coords, style: MarkerStyle) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.live_markers.insert(handle);
        self.calls.push(MapCall::AddMarker { handle, at, style });
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        assert!(
            self.live_markers.remove(&handle),
            "removed marker {:?} that is not on the map",
            handle
        );
        self.calls.push(MapCall::RemoveMarker(handle));
    }

    fn add_polyline(&mut self, points: &[Coords], _style: &PolylineStyle) -> PolylineHandle {
        self.next_handle += 1;
        let handle = PolylineHandle(self.next_handle);
        self.live_polylines.insert(handle);
        self.calls.push(MapCall::AddPolyline {
            handle,
            points: points.to_vec(),
        });
        handle
    }

    fn extend_polyline(&mut self, handle: PolylineHandle, point: Coords) {
        assert!(
            self.live_polylines.contains(&handle),
            "extended polyline {:?} that is not on the map",
            handle
        );
        self.calls.push(MapCall::ExtendPolyline { handle, point });
    }

    fn remove_polyline(&mut self, handle: PolylineHandle) {
        assert!(
            self.live_polylines.remove(&handle),
            "removed polyline {:?} that is not on the map",
            handle
        );
        self.calls.push(MapCall::RemovePolyline(handle));
    }
}

/// Confirmation gate whose answer the test can change at any time.
#[derive(Debug, Clone)]
pub struct ScriptedConfirm {
    answer: Rc<Cell<bool>>,
    prompts: Rc<RefCell<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer: Rc::new(Cell::new(answer)),
            prompts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn answer(&self, answer: bool) {
        self.answer.set(answer);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl ConfirmGate for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer.get()
    }
}

/// In-memory store whose writes can be made to fail.
#[derive(Debug, Default)]
pub struct FlakyKvStore {
    inner: MemoryKvStore,
    fail_writes: AtomicBool,
}

#[allow(dead_code)]
impl FlakyKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::Storage("quota exceeded".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KvStore for FlakyKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }
}

/// Controller over `db` with the map already loaded at [`HOME`].
#[allow(dead_code)]
pub fn open_app(db: WorkoutDb, confirm: ScriptedConfirm) -> TestApp {
    let mut app =
        LifecycleController::open(db, RecordingMap::default(), confirm, &Config::test_default());
    app.on_position(Ok(HOME)).expect("map should load");
    app
}

/// Fresh in-memory app that confirms every prompt.
#[allow(dead_code)]
pub fn test_app() -> (TestApp, Session) {
    (
        open_app(WorkoutDb::in_memory(), ScriptedConfirm::new(true)),
        Session::new(),
    )
}

/// Shared in-memory database, for tests that reopen the app.
#[allow(dead_code)]
pub fn shared_db() -> WorkoutDb {
    WorkoutDb::new(Arc::new(MemoryKvStore::new()))
}

#[allow(dead_code)]
pub fn add_run(
    app: &mut TestApp,
    session: &mut Session,
    at: Coords,
    distance: f64,
    duration: f64,
    cadence: f64,
) -> Workout {
    app.request_new(session, at);
    app.submit(session, &WorkoutInput::running(distance, duration, cadence))
        .expect("run should be valid")
        .expect("form was open")
}

#[allow(dead_code)]
pub fn add_ride(
    app: &mut TestApp,
    session: &mut Session,
    at: Coords,
    distance: f64,
    duration: f64,
    elevation_gain: f64,
) -> Workout {
    app.request_new(session, at);
    app.submit(
        session,
        &WorkoutInput::cycling(distance, duration, elevation_gain),
    )
    .expect("ride should be valid")
    .expect("form was open")
}
