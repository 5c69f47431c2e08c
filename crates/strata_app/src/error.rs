// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session errors.

use strata_animation::{AnimationError, ConfigError};
use strata_route::CommandError;
use strata_signal::SignalError;
use thiserror::Error;

/// Anything that can end a session early
#[derive(Debug, Error)]
pub enum AppError {
    /// Session file could not be read or parsed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Layers could not be synced
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    /// A route edit failed
    #[error("Route error: {0}")]
    Route(#[from] CommandError),

    /// Layers never became ready
    #[error("Readiness failed: {0}")]
    Signal(#[from] SignalError),

    /// Session file refers to something that does not exist
    #[error("Invalid session: {0}")]
    InvalidSession(String),
}
