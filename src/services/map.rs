// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interfaces of the UI collaborators: map view and confirmation prompt.
//!
//! The core never draws anything itself. It asks a [`MapView`] for markers
//! and polylines and keeps only the opaque handles it gets back.

use crate::models::Coords;

/// Opaque handle of a marker placed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Opaque handle of a polyline drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolylineHandle(pub u64);

/// Camera movement options for [`MapView::set_view`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub animate: bool,
    /// Pan animation length in seconds
    pub pan_duration: f64,
}

impl ViewOptions {
    /// Jump without animation.
    pub fn instant() -> Self {
        Self {
            animate: false,
            pan_duration: 0.0,
        }
    }

    /// One-second animated pan used when focusing a workout.
    pub fn animated() -> Self {
        Self {
            animate: true,
            pan_duration: 1.0,
        }
    }
}

/// Marker decoration.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerStyle {
    /// Workout marker with an always-open popup
    Popup { content: String, class_name: String },
    /// Red pin at the end of a drawn route
    PathEnd,
}

/// Route line appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineStyle {
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    pub smooth_factor: f64,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            color: "red",
            weight: 5,
            opacity: 1.0,
            smooth_factor: 0.5,
        }
    }
}

/// A drawn route as shown on the map: the line and the pin at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOverlay {
    pub line: PolylineHandle,
    pub end: MarkerHandle,
}

impl RouteOverlay {
    /// Take the route off the map.
    pub fn remove<M: MapView + ?Sized>(self, map: &mut M) {
        map.remove_polyline(self.line);
        map.remove_marker(self.end);
    }
}

/// Map rendering collaborator.
pub trait MapView {
    fn set_view(&mut self, center: Coords, zoom: u8, options: ViewOptions);

    fn add_marker(&mut self, at: Coords, style: MarkerStyle) -> MarkerHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn add_polyline(&mut self, points: &[Coords], style: &PolylineStyle) -> PolylineHandle;

    fn extend_polyline(&mut self, handle: PolylineHandle, point: Coords);

    fn remove_polyline(&mut self, handle: PolylineHandle);
}

/// Yes/no gate in front of destructive actions.
pub trait ConfirmGate {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Answers every prompt the same way. Useful for headless callers.
#[derive(Debug, Clone, Copy)]
pub struct AlwaysConfirm(pub bool);

impl ConfirmGate for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Map that draws nothing and hands out unique handles.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    next_handle: u64,
}

impl HeadlessMap {
    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl MapView for HeadlessMap {
    fn set_view(&mut self, _center: Coords, _zoom: u8, _options: ViewOptions) {}

    fn add_marker(&mut self, _at: Coords, _style: MarkerStyle) -> MarkerHandle {
        MarkerHandle(self.next())
    }

    fn remove_marker(&mut self, _handle: MarkerHandle) {}

    fn add_polyline(&mut self, _points: &[Coords], _style: &PolylineStyle) -> PolylineHandle {
        PolylineHandle(self.next())
    }

    fn extend_polyline(&mut self, _handle: PolylineHandle, _point: Coords) {}

    fn remove_polyline(&mut self, _handle: PolylineHandle) {}
}
