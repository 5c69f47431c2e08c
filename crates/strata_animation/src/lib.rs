// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layer animations for Strata map widgets.
//!
//! This crate provides time-stepped layer playback:
//! - Discrete layer timestamps
//! - Per-layer frame animations driven by a host clock
//! - Tile layers that own their animation and readiness signal
//! - Lockstep playback of many layers through [`AnimationSync`]
//!
//! ## Architecture
//!
//! Both a single [`FrameAnimation`] and an [`AnimationSync`] expose the same
//! [`Animatable`] control surface. A sync treats its first layer's animation
//! as the master: only the master advances on its own, every other animation
//! follows the master's time changes.

pub mod animation;
pub mod config;
pub mod error;
pub mod frame;
pub mod layer;
pub mod sync;
pub mod time;

pub use animation::{Animatable, Animation, AnimationEvents};
pub use config::{AnimationConfig, LayerConfig};
pub use error::{AnimationError, ConfigError, Result};
pub use frame::FrameAnimation;
pub use layer::{Layer, TileLayer};
pub use sync::AnimationSync;
pub use time::{Timestamp, TimestampSet};
