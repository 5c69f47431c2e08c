// SPDX-License-Identifier: MIT OR Apache-2.0
//! Map layers that own an animation.

use crate::animation::Animation;
use crate::config::AnimationConfig;
use crate::error::Result;
use crate::frame::FrameAnimation;
use crate::time::{Timestamp, TimestampSet};
use std::sync::Arc;
use strata_signal::CompletionSignal;

/// A map layer that can be animated
pub trait Layer: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// The layer's animation controller.
    ///
    /// The layer owns the controller; every call returns the same instance.
    fn animate(&self) -> Arc<dyn Animation>;

    /// Settles once the layer finished its own setup
    fn initialized(&self) -> CompletionSignal<()>;
}

/// Time-indexed tile layer
pub struct TileLayer {
    name: String,
    url: String,
    subdomains: Vec<String>,
    times: CompletionSignal<TimestampSet>,
    initialized: CompletionSignal<()>,
    animation: Arc<FrameAnimation>,
}

impl TileLayer {
    /// Create a layer whose timestamps and setup are both still pending
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        subdomains: Vec<String>,
        config: &AnimationConfig,
    ) -> Self {
        let name = name.into();
        let times = CompletionSignal::new();
        let animation = Arc::new(FrameAnimation::new(name.clone(), times.clone(), config.clone()));
        Self {
            name,
            url: url.into(),
            subdomains,
            times,
            initialized: CompletionSignal::new(),
            animation,
        }
    }

    /// Tile URL template
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Subdomains substituted for `{d}`
    pub fn subdomains(&self) -> &[String] {
        &self.subdomains
    }

    /// The layer's timestamp query
    pub fn times(&self) -> CompletionSignal<TimestampSet> {
        self.times.clone()
    }

    /// Deliver the layer's available timestamps
    pub fn load_times(&self, times: impl IntoIterator<Item = Timestamp>) -> Result<()> {
        self.times.resolve(TimestampSet::new(times))?;
        Ok(())
    }

    /// Report that the timestamp query failed
    pub fn fail_times(&self, reason: impl Into<String>) -> Result<()> {
        self.times.reject(reason)?;
        Ok(())
    }

    /// Report that the layer finished its setup
    pub fn mark_initialized(&self) -> Result<()> {
        self.initialized.resolve(())?;
        tracing::debug!("{}: layer initialized", self.name);
        Ok(())
    }

    /// Report that the layer could not be set up
    pub fn mark_failed(&self, reason: impl Into<String>) -> Result<()> {
        self.initialized.reject(reason)?;
        Ok(())
    }

    /// The URL template expanded once per subdomain.
    ///
    /// Tile coordinates stay as placeholders. A layer without subdomains
    /// yields its template unchanged.
    pub fn subdomain_urls(&self) -> Vec<String> {
        if self.subdomains.is_empty() {
            return vec![self.url.clone()];
        }
        self.subdomains
            .iter()
            .map(|subdomain| self.url.replace("{d}", subdomain))
            .collect()
    }

    /// A concrete tile URL; subdomains rotate by `(x + y)`
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        let url = match self.subdomains.len() {
            0 => self.url.clone(),
            count => {
                let index = (u64::from(x) + u64::from(y)) % count as u64;
                self.url.replace("{d}", &self.subdomains[index as usize])
            }
        };
        url.replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl std::fmt::Debug for TileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLayer")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("subdomains", &self.subdomains)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl Layer for TileLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn animate(&self) -> Arc<dyn Animation> {
        self.animation.clone()
    }

    fn initialized(&self) -> CompletionSignal<()> {
        self.initialized.clone()
    }
}
