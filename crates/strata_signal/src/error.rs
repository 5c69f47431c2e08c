// SPDX-License-Identifier: MIT OR Apache-2.0
//! Signal errors.

use thiserror::Error;

/// Errors produced by completion signals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The signal was rejected
    #[error("Signal rejected: {reason}")]
    Rejected {
        /// Why the operation failed
        reason: String,
    },

    /// The signal was already resolved or rejected
    #[error("Signal already settled")]
    AlreadySettled,
}

impl SignalError {
    /// Create a rejection with the given reason
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Result type for signal operations
pub type Result<T> = std::result::Result<T, SignalError>;
