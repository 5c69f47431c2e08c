// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation capabilities.

use crate::time::{Timestamp, TimestampSet};
use std::time::Duration;
use strata_signal::{CompletionSignal, EventEmitter};

/// Playback controls shared by single animations and syncs
pub trait Animatable: Send + Sync {
    /// Begin advancing through time
    fn start(&self);

    /// Halt time advancement, keeping the current time
    fn stop(&self);

    /// Jump to a time without changing the play state
    fn go_to_time(&self, time: Timestamp);

    /// Feed elapsed host time into the animation clock
    fn advance(&self, elapsed: Duration);
}

/// Notifications emitted by an animation
#[derive(Debug, Clone, Default)]
pub struct AnimationEvents {
    /// Playback started
    pub started: EventEmitter<()>,
    /// Playback stopped
    pub stopped: EventEmitter<()>,
    /// Current time changed; carries the new time
    pub time_changed: EventEmitter<Timestamp>,
}

impl AnimationEvents {
    /// Create an empty set of emitters
    pub fn new() -> Self {
        Self::default()
    }
}

/// A per-layer animation over a set of discrete timestamps
pub trait Animation: Animatable {
    /// Timestamps this animation can show; settles once they are known
    fn times(&self) -> CompletionSignal<TimestampSet>;

    /// Event emitters for this animation
    fn events(&self) -> &AnimationEvents;

    /// The time currently shown, if one has been selected
    fn current_time(&self) -> Option<Timestamp>;

    /// Whether the animation is advancing on its own
    fn is_playing(&self) -> bool;
}
