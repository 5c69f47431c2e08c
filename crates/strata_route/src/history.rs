// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history of route commands.

use crate::command::{RouteCommand, TrackedCommand};
use crate::error::{CommandError, Result};
use crate::route::Route;
use std::collections::VecDeque;
use strata_signal::CompletionSignal;

/// Maximum undo history depth
pub const MAX_HISTORY: usize = 100;

/// History statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    /// Commands in the undo stack
    pub undo_count: usize,
    /// Commands in the redo stack
    pub redo_count: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Runs route commands and keeps them for undo and redo.
///
/// Executing a new command clears the redo stack. When the undo stack grows
/// past `max_depth`, the oldest command is dropped.
#[derive(Debug)]
pub struct CommandInvoker {
    /// Undo stack, most recent at the back
    undo_stack: VecDeque<TrackedCommand>,
    /// Redo stack, most recent at the back
    redo_stack: VecDeque<TrackedCommand>,
    max_depth: usize,
}

impl CommandInvoker {
    /// Create an invoker with the default history depth
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    /// Execute a command and record it for undo
    pub fn execute(
        &mut self,
        command: impl RouteCommand + 'static,
        route: &mut Route,
    ) -> Result<CompletionSignal<()>> {
        self.execute_boxed(Box::new(command), route)
    }

    /// Execute a boxed command and record it for undo
    pub fn execute_boxed(
        &mut self,
        command: Box<dyn RouteCommand>,
        route: &mut Route,
    ) -> Result<CompletionSignal<()>> {
        let mut command = TrackedCommand::from_boxed(command);
        let signal = command.execute(route)?;

        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }

        Ok(signal)
    }

    /// Undo the most recent command
    pub fn undo(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        let mut command = self
            .undo_stack
            .pop_back()
            .ok_or(CommandError::NothingToUndo)?;

        match command.undo(route) {
            Ok(signal) => {
                self.redo_stack.push_back(command);
                Ok(signal)
            }
            Err(err) => {
                tracing::warn!("Undo failed: {err}");
                self.undo_stack.push_back(command);
                Err(err)
            }
        }
    }

    /// Re-execute the most recently undone command
    pub fn redo(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        let mut command = self
            .redo_stack
            .pop_back()
            .ok_or(CommandError::NothingToRedo)?;

        match command.execute(route) {
            Ok(signal) => {
                self.undo_stack.push_back(command);
                Ok(signal)
            }
            Err(err) => {
                tracing::warn!("Redo failed: {err}");
                self.redo_stack.push_back(command);
                Err(err)
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(TrackedCommand::description)
    }

    /// Get description of next redo operation
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(TrackedCommand::description)
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            max_depth: self.max_depth,
        }
    }
}

impl Default for CommandInvoker {
    fn default() -> Self {
        Self::new()
    }
}
