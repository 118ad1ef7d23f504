// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mapty: log runs and rides on a map.
//!
//! This crate provides the workout model, its persistence round-trip, the
//! create/edit/delete/sort lifecycle and interactive route drawing. Map
//! rendering and user prompts are supplied by the embedding UI through the
//! traits in [`services::map`].

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use error::{AppError, Result};
