// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undoable route commands.
//!
//! A concrete command implements [`RouteCommand`]; [`TrackedCommand`] wraps it
//! and owns the execute/undo lifecycle, so no command has to guard against
//! being run out of order.

use crate::error::{CommandError, Result};
use crate::route::Route;
use strata_signal::CompletionSignal;

/// A reversible change to a route.
///
/// Mutations return a completion signal because some edits finish later
/// (for example after a lookup). Edits that finish immediately return an
/// already-resolved signal.
pub trait RouteCommand: Send {
    /// Human-readable description, used for undo/redo menus
    fn description(&self) -> String;

    /// Record whatever undo needs from the live route.
    ///
    /// Called once, right before the first [`perform_execute`](Self::perform_execute).
    fn capture_original(&mut self, _route: &Route) -> Result<()> {
        Ok(())
    }

    /// Apply the change
    fn perform_execute(&mut self, route: &mut Route) -> Result<CompletionSignal<()>>;

    /// Revert the change using the captured original
    fn perform_undo(&mut self, route: &mut Route) -> Result<CompletionSignal<()>>;
}

/// Lifecycle state of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    /// Never executed, or undone
    #[default]
    Unexecuted,
    /// Executed and not undone
    Executed,
}

/// A command together with its lifecycle state
pub struct TrackedCommand {
    command: Box<dyn RouteCommand>,
    state: CommandState,
    captured: bool,
}

impl TrackedCommand {
    /// Track a command
    pub fn new(command: impl RouteCommand + 'static) -> Self {
        Self::from_boxed(Box::new(command))
    }

    /// Track a boxed command
    pub fn from_boxed(command: Box<dyn RouteCommand>) -> Self {
        Self {
            command,
            state: CommandState::Unexecuted,
            captured: false,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> CommandState {
        self.state
    }

    /// Check whether the command is executed
    pub fn is_executed(&self) -> bool {
        self.state == CommandState::Executed
    }

    /// Description of the wrapped command
    pub fn description(&self) -> String {
        self.command.description()
    }

    /// Execute the command.
    ///
    /// Fails with [`CommandError::AlreadyExecuted`] unless the command is
    /// unexecuted. The original values are captured before the first
    /// execution only. If the command itself fails, the state is unchanged.
    pub fn execute(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        if self.state == CommandState::Executed {
            return Err(CommandError::AlreadyExecuted);
        }

        if !self.captured {
            self.command.capture_original(route)?;
            self.captured = true;
        }

        let signal = self.command.perform_execute(route)?;
        self.state = CommandState::Executed;
        tracing::debug!("Executed: {}", self.command.description());
        Ok(signal)
    }

    /// Undo the command.
    ///
    /// Fails with [`CommandError::NotExecuted`] unless the command is
    /// executed.
    pub fn undo(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        if self.state != CommandState::Executed {
            return Err(CommandError::NotExecuted);
        }

        let signal = self.command.perform_undo(route)?;
        self.state = CommandState::Unexecuted;
        tracing::debug!("Undone: {}", self.command.description());
        Ok(signal)
    }
}

impl std::fmt::Debug for TrackedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedCommand")
            .field("description", &self.command.description())
            .field("state", &self.state)
            .finish()
    }
}
