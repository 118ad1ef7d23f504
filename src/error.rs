// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! No error is fatal: validation problems are shown to the user, missing
//! workouts are ignored, and unreadable saved data is treated as an empty
//! history.

/// Application error type shared by the model, store and controller.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Inputs have to be positive numbers: {0}")]
    Validation(String),

    #[error("Workout not found: {0}")]
    NotFound(String),

    #[error("Saved workouts could not be restored: {0}")]
    Restore(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Could not get the position: {0}")]
    Geolocation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Errors that callers swallow without telling the user.
    ///
    /// A stale reference to an already-removed workout is expected after
    /// deletes and edits, so `NotFound` never reaches the UI.
    pub fn is_silent(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Errors that should be shown to the user as a message.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::Geolocation(_))
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
