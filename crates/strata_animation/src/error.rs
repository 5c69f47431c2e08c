// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation and configuration errors.

use strata_signal::SignalError;
use thiserror::Error;

/// Errors raised by animations, layers and syncs
#[derive(Debug, Error)]
pub enum AnimationError {
    /// A sync needs at least one layer to follow
    #[error("Animation sync requires at least one layer")]
    EmptyLayers,

    /// A readiness or timestamp signal could not be settled
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),
}

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The RON text is malformed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Writing RON failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
