// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session files.
//!
//! A session describes the animated layers to sync, how to drive the clock,
//! and a scripted list of route edits.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strata_animation::{AnimationConfig, ConfigError, LayerConfig};
use strata_route::LatLon;

/// Default session file name
pub const DEFAULT_SESSION_FILE: &str = "sessions/radar.ron";

/// Host clock settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Time between host ticks, in milliseconds
    pub tick_ms: u64,
    /// Number of ticks to run
    pub ticks: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            ticks: 20,
        }
    }
}

impl ClockConfig {
    /// Tick period as a duration
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// A scripted waypoint move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveConfig {
    /// Index of the waypoint in the route
    pub waypoint: usize,
    /// Where to move it
    pub to: LatLon,
}

/// Route to build and edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Initial waypoints, in order
    pub waypoints: Vec<LatLon>,
    /// Moves applied one after another
    pub moves: Vec<MoveConfig>,
}

/// Complete session description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Frame animation settings shared by all layers
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Layers to sync; the first one drives the others
    pub layers: Vec<LayerConfig>,
    /// Host clock
    #[serde(default)]
    pub clock: ClockConfig,
    /// Route editing script
    #[serde(default)]
    pub route: RouteConfig,
}

impl SessionConfig {
    /// Parse from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a session file
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_ron(&text)?;
        tracing::info!(
            "Loaded session {:?}: {} layers, {} waypoints",
            path,
            config.layers.len(),
            config.route.waypoints.len()
        );
        Ok(config)
    }
}
