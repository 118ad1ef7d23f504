// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer over a string-keyed store.

pub mod file;
pub mod kv;
pub mod workout_db;

pub use file::FileKvStore;
pub use kv::{KvStore, MemoryKvStore};
pub use workout_db::WorkoutDb;

/// Storage keys as constants.
pub mod keys {
    /// JSON array of every workout record
    pub const WORKOUTS: &str = "workouts";
    /// Prefix of the per-workout drawn route, followed by the workout id
    pub const PATH_PREFIX: &str = "path-";

    /// Key holding the drawn route of `workout_id`.
    pub fn path(workout_id: &str) -> String {
        format!("{}{}", PATH_PREFIX, workout_id)
    }
}
