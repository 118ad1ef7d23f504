// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - workout lifecycle and UI-facing state machines.

pub mod drawing;
pub mod lifecycle;
pub mod map;
pub mod store;

pub use drawing::{DrawingTicket, PathDrawingSession};
pub use lifecycle::{FormMode, LifecycleController, MapClick, Session};
pub use map::{
    AlwaysConfirm, ConfirmGate, HeadlessMap, MapView, MarkerHandle, MarkerStyle, PolylineHandle,
    PolylineStyle, RouteOverlay, ViewOptions,
};
pub use store::{SortField, WorkoutStore};
