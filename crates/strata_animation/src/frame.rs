// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame animation stepping through a layer's timestamps.

use crate::animation::{Animatable, Animation, AnimationEvents};
use crate::config::AnimationConfig;
use crate::time::{Timestamp, TimestampSet};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use strata_signal::CompletionSignal;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not advancing
    #[default]
    Stopped,
    /// Advancing on host ticks
    Playing,
}

#[derive(Debug, Default)]
struct Playback {
    state: PlaybackState,
    /// Known once the timestamp query resolves
    frames: Option<TimestampSet>,
    index: Option<usize>,
    /// Seek requested before frames were known
    pending_seek: Option<Timestamp>,
    /// Host time accumulated toward the next step
    elapsed: Duration,
}

impl Playback {
    fn current_time(&self) -> Option<Timestamp> {
        let index = self.index?;
        self.frames.as_ref()?.get(index)
    }

    /// Move to the frame nearest `time`; returns the new time if it changed
    fn seek(&mut self, time: Timestamp) -> Option<Timestamp> {
        let index = self.frames.as_ref()?.nearest(time)?;
        if self.index == Some(index) {
            return None;
        }
        self.index = Some(index);
        self.elapsed = Duration::ZERO;
        self.current_time()
    }

    /// Fold extra whole loops out of the pending time so at most two loops
    /// replay; a full loop lands on the same frame
    fn fold_loops(&mut self, interval: Duration, len: usize) {
        let cycle = interval.as_nanos() * len as u128;
        let pending = self.elapsed.as_nanos();
        if pending >= 2 * cycle {
            let kept = cycle + (pending - cycle) % cycle;
            self.elapsed = Duration::from_nanos(u64::try_from(kept).unwrap_or(u64::MAX));
        }
    }
}

/// Animation over one layer's timestamps.
///
/// The clock is driven by the host through [`Animatable::advance`]; while
/// playing, each `frame_interval` of elapsed time steps to the next
/// timestamp.
pub struct FrameAnimation {
    name: String,
    config: AnimationConfig,
    times: CompletionSignal<TimestampSet>,
    events: AnimationEvents,
    playback: Arc<Mutex<Playback>>,
}

impl FrameAnimation {
    /// Create an animation whose timestamps arrive through `times`
    pub fn new(
        name: impl Into<String>,
        times: CompletionSignal<TimestampSet>,
        config: AnimationConfig,
    ) -> Self {
        let name = name.into();
        let events = AnimationEvents::new();
        let playback = Arc::new(Mutex::new(Playback::default()));

        let loaded = Arc::clone(&playback);
        let time_changed = events.time_changed.clone();
        let layer = name.clone();
        times.done(move |frames| {
            tracing::debug!("{layer}: {} timestamps available", frames.len());
            let changed = {
                let mut playback = loaded.lock();
                playback.frames = Some(frames.clone());
                playback
                    .pending_seek
                    .take()
                    .and_then(|time| playback.seek(time))
            };
            if let Some(time) = changed {
                time_changed.emit(&time);
            }
        });

        let layer = name.clone();
        times.fail(move |error| {
            tracing::warn!("{layer}: timestamp query failed: {error}");
        });

        Self {
            name,
            config,
            times,
            events,
            playback,
        }
    }

    /// Create an animation over timestamps that are already known
    pub fn with_times(
        name: impl Into<String>,
        times: impl IntoIterator<Item = Timestamp>,
        config: AnimationConfig,
    ) -> Self {
        Self::new(name, CompletionSignal::resolved(TimestampSet::new(times)), config)
    }

    /// Layer name used in logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Playback configuration
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Index of the current frame
    pub fn current_index(&self) -> Option<usize> {
        self.playback.lock().index
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.playback.lock().state
    }
}

impl std::fmt::Debug for FrameAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameAnimation")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("playback", &*self.playback.lock())
            .finish()
    }
}

impl Animatable for FrameAnimation {
    fn start(&self) {
        let initialized = {
            let mut playback = self.playback.lock();
            playback.state = PlaybackState::Playing;
            playback.elapsed = Duration::ZERO;
            if playback.index.is_none() && playback.frames.as_ref().is_some_and(|f| !f.is_empty()) {
                playback.index = Some(0);
                playback.current_time()
            } else {
                None
            }
        };

        tracing::debug!("{}: started", self.name);
        self.events.started.emit(&());
        if let Some(time) = initialized {
            self.events.time_changed.emit(&time);
        }
    }

    fn stop(&self) {
        let was_playing = {
            let mut playback = self.playback.lock();
            let was_playing = playback.state == PlaybackState::Playing;
            playback.state = PlaybackState::Stopped;
            playback.elapsed = Duration::ZERO;
            was_playing
        };

        if was_playing {
            tracing::debug!("{}: stopped", self.name);
            self.events.stopped.emit(&());
        }
    }

    fn go_to_time(&self, time: Timestamp) {
        let changed = {
            let mut playback = self.playback.lock();
            if playback.frames.is_none() {
                playback.pending_seek = Some(time);
                None
            } else {
                playback.seek(time)
            }
        };

        if let Some(time) = changed {
            self.events.time_changed.emit(&time);
        }
    }

    fn advance(&self, elapsed: Duration) {
        let interval = self.config.frame_interval();
        let mut stepped = Vec::new();
        let mut finished = false;

        {
            let mut playback = self.playback.lock();
            if playback.state != PlaybackState::Playing || interval.is_zero() {
                return;
            }
            let Some(len) = playback.frames.as_ref().map(TimestampSet::len) else {
                return;
            };
            if len == 0 {
                return;
            }

            playback.elapsed = playback.elapsed.saturating_add(elapsed);
            if self.config.looping {
                playback.fold_loops(interval, len);
            }
            while playback.elapsed >= interval {
                playback.elapsed -= interval;
                let next = playback.index.map_or(0, |index| index + 1);
                if next < len {
                    playback.index = Some(next);
                } else if self.config.looping {
                    playback.index = Some(0);
                } else {
                    playback.state = PlaybackState::Stopped;
                    playback.elapsed = Duration::ZERO;
                    finished = true;
                    break;
                }
                stepped.extend(playback.current_time());
            }
        }

        for time in stepped {
            self.events.time_changed.emit(&time);
        }
        if finished {
            tracing::debug!("{}: reached last frame", self.name);
            self.events.stopped.emit(&());
        }
    }
}

impl Animation for FrameAnimation {
    fn times(&self) -> CompletionSignal<TimestampSet> {
        self.times.clone()
    }

    fn events(&self) -> &AnimationEvents {
        &self.events
    }

    fn current_time(&self) -> Option<Timestamp> {
        self.playback.lock().current_time()
    }

    fn is_playing(&self) -> bool {
        self.playback.lock().state == PlaybackState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(config: AnimationConfig) -> FrameAnimation {
        FrameAnimation::with_times("radar", [0, 100, 200].map(Timestamp), config)
    }

    fn record_times(animation: &FrameAnimation) -> Arc<Mutex<Vec<Timestamp>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        animation.events().time_changed.on(move |time| sink.lock().push(*time));
        seen
    }

    #[test]
    fn test_start_initializes_first_frame() {
        let animation = frames(AnimationConfig::default());
        let seen = record_times(&animation);
        assert_eq!(animation.current_time(), None);

        animation.start();
        assert!(animation.is_playing());
        assert_eq!(animation.current_time(), Some(Timestamp(0)));
        assert_eq!(*seen.lock(), vec![Timestamp(0)]);
    }

    #[test]
    fn test_advance_steps_per_interval() {
        let animation = frames(AnimationConfig {
            frame_interval_ms: 100,
            looping: true,
        });
        animation.start();
        let seen = record_times(&animation);

        animation.advance(Duration::from_millis(50));
        assert!(seen.lock().is_empty());

        animation.advance(Duration::from_millis(250));
        assert_eq!(*seen.lock(), vec![Timestamp(100), Timestamp(200), Timestamp(0)]);
    }

    #[test]
    fn test_huge_advance_saturates() {
        let animation = frames(AnimationConfig {
            frame_interval_ms: 100,
            looping: true,
        });
        animation.start();
        animation.advance(Duration::from_millis(400));
        assert_eq!(animation.current_time(), Some(Timestamp(100)));

        animation.advance(Duration::MAX);
        assert!(animation.is_playing());
        assert!(animation.current_time().is_some());

        let seen = record_times(&animation);
        animation.advance(Duration::MAX);
        assert!(seen.lock().len() < 6);
    }

    #[test]
    fn test_looping_advance_folds_whole_cycles() {
        let animation = frames(AnimationConfig {
            frame_interval_ms: 100,
            looping: true,
        });
        animation.start();
        let seen = record_times(&animation);

        // 10 whole loops plus one step replay as a single loop
        animation.advance(Duration::from_millis(3_100));
        assert_eq!(
            *seen.lock(),
            vec![Timestamp(100), Timestamp(200), Timestamp(0), Timestamp(100)]
        );
        assert_eq!(animation.current_time(), Some(Timestamp(100)));
    }

    #[test]
    fn test_huge_advance_without_looping_stops_at_end() {
        let animation = frames(AnimationConfig {
            frame_interval_ms: 100,
            looping: false,
        });
        animation.start();
        animation.advance(Duration::from_millis(50));
        animation.advance(Duration::MAX);

        assert!(!animation.is_playing());
        assert_eq!(animation.current_time(), Some(Timestamp(200)));
    }

    #[test]
    fn test_advance_without_looping_stops_at_end() {
        let animation = frames(AnimationConfig {
            frame_interval_ms: 100,
            looping: false,
        });
        let stopped = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&stopped);
        animation.events().stopped.on(move |_| *counter.lock() += 1);

        animation.start();
        animation.advance(Duration::from_millis(1_000));

        assert!(!animation.is_playing());
        assert_eq!(animation.current_time(), Some(Timestamp(200)));
        assert_eq!(*stopped.lock(), 1);
    }

    #[test]
    fn test_stopped_animation_ignores_ticks() {
        let animation = frames(AnimationConfig::default());
        animation.start();
        animation.stop();
        animation.advance(Duration::from_secs(10));
        assert_eq!(animation.current_time(), Some(Timestamp(0)));
    }

    #[test]
    fn test_go_to_time_snaps_and_keeps_play_state() {
        let animation = frames(AnimationConfig::default());
        let seen = record_times(&animation);

        animation.go_to_time(Timestamp(180));
        assert_eq!(animation.current_time(), Some(Timestamp(200)));
        assert!(!animation.is_playing());

        // Same frame again: no notification
        animation.go_to_time(Timestamp(210));
        assert_eq!(*seen.lock(), vec![Timestamp(200)]);
    }

    #[test]
    fn test_seek_before_times_known_is_applied_later() {
        let times = CompletionSignal::new();
        let animation = FrameAnimation::new("late", times.clone(), AnimationConfig::default());
        let seen = record_times(&animation);

        animation.go_to_time(Timestamp(100));
        assert_eq!(animation.current_time(), None);

        times.resolve(TimestampSet::new([0, 100].map(Timestamp))).unwrap();
        assert_eq!(animation.current_time(), Some(Timestamp(100)));
        assert_eq!(*seen.lock(), vec![Timestamp(100)]);
    }

    #[test]
    fn test_stop_emits_only_when_playing() {
        let animation = frames(AnimationConfig::default());
        let stopped = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&stopped);
        animation.events().stopped.on(move |_| *counter.lock() += 1);

        animation.stop();
        animation.start();
        animation.stop();
        animation.stop();
        assert_eq!(*stopped.lock(), 1);
    }
}
