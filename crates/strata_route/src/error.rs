// SPDX-License-Identifier: MIT OR Apache-2.0
//! Route and command errors.

use crate::waypoint::WaypointId;
use strata_signal::SignalError;
use thiserror::Error;

/// Errors raised while editing a route
#[derive(Debug, Error)]
pub enum CommandError {
    /// `execute` called on a command that is already executed
    #[error("Command already executed")]
    AlreadyExecuted,

    /// `undo` called on a command that is not executed
    #[error("Command not executed")]
    NotExecuted,

    /// Waypoint not found
    #[error("Waypoint not found: {0:?}")]
    WaypointNotFound(WaypointId),

    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Completion signal error
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Result type for route operations
pub type Result<T> = std::result::Result<T, CommandError>;
