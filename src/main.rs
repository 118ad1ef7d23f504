// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mapty workout inspector
//!
//! Lists the workouts saved in the configured data directory, with their
//! drawn route length, without needing a map.

use mapty_tracker::{
    config::Config,
    db::{FileKvStore, WorkoutDb},
    services::{AlwaysConfirm, HeadlessMap, LifecycleController, PathDrawingSession},
    time_utils::format_utc_rfc3339,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging(&config);

    let store = FileKvStore::open(&config.data_dir)?;
    tracing::info!(dir = %store.dir().display(), "Opened workout data");
    let db = WorkoutDb::new(Arc::new(store));

    // Declining every prompt keeps the inspector read-only.
    let app = LifecycleController::open(db, HeadlessMap::default(), AlwaysConfirm(false), &config);

    if app.workouts().is_empty() {
        println!("No workouts saved in {}", config.data_dir.display());
        return Ok(());
    }

    for workout in app.workouts() {
        let path = PathDrawingSession::load_saved(app.db(), workout.id(), workout.coords());
        println!(
            "{}  {}  {}",
            workout.id(),
            format_utc_rfc3339(workout.created_at()),
            workout.summary()
        );
        if path.len() > 1 {
            println!(
                "            route: {} points, {:.2} km",
                path.len(),
                path.length_km()
            );
            match path.encode() {
                Ok(encoded) => println!("            polyline: {}", encoded),
                Err(e) => tracing::warn!(workout_id = workout.id(), error = %e, "Route not encodable"),
            }
        }
    }

    Ok(())
}

/// Initialize logging: JSON lines when configured, human-readable otherwise.
fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
