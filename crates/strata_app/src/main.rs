// SPDX-License-Identifier: MIT OR Apache-2.0
//! Strata session runner.
//!
//! Loads a session file, plays its layers in lockstep and replays its route
//! edits through the undo/redo history:
//! - Layers are built from the session and synced to the first one
//! - A tokio interval drives the master animation clock
//! - Route moves are executed, undone and redone
//!
//! Usage: `strata [SESSION_FILE]` (defaults to `sessions/radar.ron`).

mod editor;
mod error;
mod player;
mod session;

use error::AppError;
use session::{SessionConfig, DEFAULT_SESSION_FILE};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("strata_app=info,strata_animation=debug,strata_route=debug")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Strata v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

    if let Err(e) = run(&path).await {
        tracing::error!("Session failed: {e}");
        std::process::exit(1);
    }
}

async fn run(path: &Path) -> Result<(), AppError> {
    let config = SessionConfig::load(path).await?;

    let last_frame = player::play(&config).await?;
    tracing::info!("Playback finished at {last_frame:?}");

    let route = editor::edit(&config.route).await?;
    for waypoint in route.iter() {
        tracing::info!("Waypoint {}", waypoint.lat_lon);
    }

    Ok(())
}
