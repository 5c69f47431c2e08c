// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation and layer configuration.

use crate::error::ConfigError;
use crate::layer::TileLayer;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time each frame is shown
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 500;

/// Playback settings for frame animations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// How long each timestamp is shown before stepping, in milliseconds
    pub frame_interval_ms: u64,
    /// Wrap to the first timestamp after the last one
    pub looping: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            looping: true,
        }
    }
}

impl AnimationConfig {
    /// Frame interval as a duration
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Parse from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize to pretty RON text
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

/// Description of a tile layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Display name
    pub name: String,
    /// Tile URL template with `{d}`, `{z}`, `{x}` and `{y}` placeholders
    pub url: String,
    /// Values substituted for `{d}`
    #[serde(default)]
    pub subdomains: Vec<String>,
    /// Timestamps known up front; empty means they are loaded later
    #[serde(default)]
    pub timestamps: Vec<Timestamp>,
}

impl LayerConfig {
    /// Build a tile layer from this description.
    ///
    /// Preconfigured timestamps resolve the layer's timestamp query right
    /// away.
    pub fn build(&self, animation: &AnimationConfig) -> TileLayer {
        let layer = TileLayer::new(
            self.name.clone(),
            self.url.clone(),
            self.subdomains.clone(),
            animation,
        );
        if !self.timestamps.is_empty() {
            // A freshly built layer has a pending query, so this cannot fail.
            let _ = layer.load_times(self.timestamps.iter().copied());
        }
        layer
    }
}
