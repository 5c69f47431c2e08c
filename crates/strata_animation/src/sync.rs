// SPDX-License-Identifier: MIT OR Apache-2.0
//! Lockstep playback of several layer animations.
//!
//! The first layer is the sync source ("master"). Once every layer reports
//! its timestamps and its own setup, starting the sync:
//! 1. kick-starts every follower and stops it again on its `started` event,
//!    so the follower has a valid current frame but never runs on its own
//! 2. forwards every master time change to all followers
//! 3. starts the master
//!
//! Layer membership is fixed at construction.

use crate::animation::{Animatable, Animation};
use crate::error::{AnimationError, Result};
use crate::layer::Layer;
use crate::time::{Timestamp, TimestampSet};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use strata_signal::{when_all, CompletionSignal, Subscription};

#[derive(Debug, Default)]
struct SyncState {
    /// `start` was called and not cancelled by `stop`
    start_requested: bool,
    /// A start handler is waiting on readiness
    start_deferred: bool,
    /// Master time-change forwarding handler
    master_subscription: Option<Subscription>,
}

/// Plays many layer animations as one.
pub struct AnimationSync {
    layers: Arc<[Arc<dyn Layer>]>,
    animations: Arc<[Arc<dyn Animation>]>,
    initialized: CompletionSignal<()>,
    state: Arc<Mutex<SyncState>>,
}

impl AnimationSync {
    /// Sync the given layers; the first one drives the others.
    ///
    /// Fails with [`AnimationError::EmptyLayers`] when `layers` is empty.
    /// Readiness is checked in the background; construction never blocks.
    pub fn new(layers: Vec<Arc<dyn Layer>>) -> Result<Self> {
        if layers.is_empty() {
            return Err(AnimationError::EmptyLayers);
        }

        let animations: Arc<[Arc<dyn Animation>]> =
            layers.iter().map(|layer| layer.animate()).collect();
        let layers: Arc<[Arc<dyn Layer>]> = layers.into();
        let initialized = when_ready(&layers, &animations);

        tracing::debug!(
            "animation sync over {} layers, master '{}'",
            layers.len(),
            layers[0].name()
        );

        Ok(Self {
            layers,
            animations,
            initialized,
            state: Arc::new(Mutex::new(SyncState::default())),
        })
    }

    /// Readiness signal; resolves once every layer and timestamp query has
    /// completed, or is rejected for good if any of them failed
    pub fn initialized(&self) -> CompletionSignal<()> {
        self.initialized.clone()
    }

    /// The layer every other layer follows
    pub fn sync_to_layer(&self) -> &Arc<dyn Layer> {
        // Non-empty by construction.
        &self.layers[0]
    }

    /// The animation every other animation follows
    pub fn sync_to_animation(&self) -> &Arc<dyn Animation> {
        &self.animations[0]
    }

    /// All layers, master first
    pub fn layers(&self) -> &[Arc<dyn Layer>] {
        &self.layers
    }

    /// All animations, index-aligned with [`layers`](Self::layers)
    pub fn animations(&self) -> &[Arc<dyn Animation>] {
        &self.animations
    }

    /// Number of synced layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; a sync holds at least one layer
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl std::fmt::Debug for AnimationSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSync")
            .field("layers", &self.layers.iter().map(|l| l.name()).collect::<Vec<_>>())
            .field("initialized", &self.initialized)
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl Animatable for AnimationSync {
    /// Start synced playback.
    ///
    /// Before readiness the start is deferred; repeated calls while waiting
    /// collapse into a single deferred start.
    fn start(&self) {
        {
            let mut state = self.state.lock();
            state.start_requested = true;
            if state.start_deferred {
                return;
            }
            state.start_deferred = true;
        }

        if self.initialized.is_pending() {
            tracing::debug!("animation sync: start deferred until ready");
        }

        let animations = Arc::clone(&self.animations);
        let state = Arc::clone(&self.state);
        self.initialized.done(move |_| {
            let requested = {
                let mut state = state.lock();
                state.start_deferred = false;
                std::mem::take(&mut state.start_requested)
            };
            if requested {
                begin_playback(&animations, &state);
            }
        });
    }

    fn stop(&self) {
        let subscription = {
            let mut state = self.state.lock();
            state.start_requested = false;
            state.master_subscription.take()
        };

        let master = self.sync_to_animation();
        if let Some(subscription) = subscription {
            master.events().time_changed.off(subscription);
        }
        master.stop();
    }

    fn go_to_time(&self, time: Timestamp) {
        fan_out(&self.animations[1..], time);
    }

    /// Drive the master clock; followers only move through the master
    fn advance(&self, elapsed: Duration) {
        self.sync_to_animation().advance(elapsed);
    }
}

impl Drop for AnimationSync {
    /// Cancel any deferred start and detach master forwarding
    fn drop(&mut self) {
        let subscription = {
            let mut state = self.state.lock();
            state.start_requested = false;
            state.master_subscription.take()
        };
        if let Some(subscription) = subscription {
            self.animations[0].events().time_changed.off(subscription);
        }
    }
}

/// Combine every timestamp query and layer setup into one readiness signal
fn when_ready(layers: &[Arc<dyn Layer>], animations: &[Arc<dyn Animation>]) -> CompletionSignal<()> {
    let pending = layers
        .iter()
        .zip(animations)
        .flat_map(|(layer, animation)| {
            [
                animation.times().map(|_: &TimestampSet| ()),
                layer.initialized(),
            ]
        });

    let initialized = when_all(pending).map(|_| ());
    initialized.done(|_| tracing::debug!("animation sync ready"));
    initialized.fail(|error| {
        tracing::warn!("animation sync will never start: {error}");
    });
    initialized
}

/// Kick-start-then-freeze every follower, then let the master run
fn begin_playback(animations: &[Arc<dyn Animation>], state: &Mutex<SyncState>) {
    let Some((master, followers)) = animations.split_first() else {
        return;
    };

    for follower in followers {
        let weak = Arc::downgrade(follower);
        follower.events().started.once(move |_| {
            if let Some(follower) = weak.upgrade() {
                follower.stop();
            }
        });
        follower.start();
    }

    let forward_to: Arc<[Arc<dyn Animation>]> = followers.into();
    let subscription = master
        .events()
        .time_changed
        .on(move |time| fan_out(&forward_to, *time));
    let previous = state.lock().master_subscription.replace(subscription);
    if let Some(previous) = previous {
        master.events().time_changed.off(previous);
    }

    tracing::debug!("animation sync: playing, {} followers", followers.len());
    master.start();
}

fn fan_out(followers: &[Arc<dyn Animation>], time: Timestamp) {
    tracing::trace!("animation sync: followers to {time}");
    for follower in followers {
        follower.go_to_time(time);
    }
}
