// SPDX-License-Identifier: MIT OR Apache-2.0
//! Synced layer playback driven by a tokio interval.

use crate::error::AppError;
use crate::session::SessionConfig;
use std::sync::Arc;
use strata_animation::{Animatable, AnimationSync, Layer, TileLayer};

/// Build the session's layers, sync them and play for the configured ticks.
///
/// Returns the master time after the last tick.
pub async fn play(config: &SessionConfig) -> Result<Option<i64>, AppError> {
    let tiles: Vec<Arc<TileLayer>> = config
        .layers
        .iter()
        .map(|layer| Arc::new(layer.build(&config.animation)))
        .collect();
    let layers: Vec<Arc<dyn Layer>> = tiles.iter().map(|t| Arc::clone(t) as Arc<dyn Layer>).collect();
    let sync = AnimationSync::new(layers)?;

    let master = Arc::clone(sync.sync_to_animation());
    master.events().time_changed.on(|time| tracing::info!("Master frame: {time}"));

    // Playback waits for readiness on its own.
    sync.start();

    for (tile, layer) in tiles.iter().zip(&config.layers) {
        if layer.timestamps.is_empty() {
            tile.fail_times(format!("no timestamps configured for '{}'", layer.name))?;
        }
        tracing::debug!("{}: {} tile hosts", layer.name, tile.subdomain_urls().len());
        tile.mark_initialized()?;
    }
    sync.initialized().await?;

    let tick = config.clock.tick();
    let mut interval = tokio::time::interval(tick);
    for _ in 0..config.clock.ticks {
        interval.tick().await;
        sync.advance(tick);
    }
    sync.stop();

    for layer in sync.layers() {
        tracing::info!(
            "{} stopped at {:?}",
            layer.name(),
            layer.animate().current_time()
        );
    }

    Ok(master.current_time().map(|time| time.as_millis()))
}
