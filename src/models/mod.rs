// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod input;
pub mod path;
pub mod workout;

pub use input::WorkoutInput;
pub use path::{PathError, PathLine};
pub use workout::{Coords, StoredWorkout, Workout, WorkoutDetails, WorkoutKind};
