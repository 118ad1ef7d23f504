// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local use.

use std::env;
use std::path::PathBuf;

/// Zoom level used whenever the map is centred on a workout.
pub const DEFAULT_MAP_ZOOM: u8 = 13;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the file-backed key-value store
    pub data_dir: PathBuf,
    /// Map zoom level for `set_view` calls
    pub map_zoom: u8,
    /// Emit logs as JSON instead of human-readable lines
    pub log_json: bool,
    /// `tracing_subscriber::EnvFilter` directives
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            map_zoom: DEFAULT_MAP_ZOOM,
            log_json: false,
            log_filter: "mapty_tracker=debug,info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set but malformed values are
    /// reported instead of silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let map_zoom = match env::var("MAPTY_MAP_ZOOM") {
            Ok(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|zoom| *zoom <= 20)
                .ok_or(ConfigError::Invalid("MAPTY_MAP_ZOOM", raw))?,
            Err(_) => defaults.map_zoom,
        };

        let log_json = match env::var("MAPTY_LOG_JSON") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("MAPTY_LOG_JSON", raw))?,
            Err(_) => defaults.log_json,
        };

        Ok(Self {
            data_dir: env::var("MAPTY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            map_zoom,
            log_json,
            log_filter: env::var("MAPTY_LOG_FILTER").unwrap_or(defaults.log_filter),
        })
    }

    /// Config for tests: default zoom, throwaway data directory name.
    pub fn test_default() -> Self {
        Self {
            data_dir: PathBuf::from("test-data"),
            ..Self::default()
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
