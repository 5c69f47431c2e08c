// SPDX-License-Identifier: MIT OR Apache-2.0
//! Route editing for Strata map widgets.
//!
//! This crate provides the route model and its undoable edits:
//! - Waypoints with a manual position and an optional geocoded position
//! - Routes holding ordered waypoints and emitting change events
//! - The [`RouteCommand`] execute/undo lifecycle, enforced by [`TrackedCommand`]
//! - Concrete move/add/remove waypoint commands
//! - A [`CommandInvoker`] keeping undo and redo stacks

pub mod command;
pub mod commands;
pub mod error;
pub mod history;
pub mod route;
pub mod waypoint;

pub use command::{CommandState, RouteCommand, TrackedCommand};
pub use commands::{AddWaypointCommand, MoveWaypointCommand, RemoveWaypointCommand, WaypointSnapshot};
pub use error::{CommandError, Result};
pub use history::{CommandInvoker, HistoryStats};
pub use route::{Route, RouteEvent, RouteId};
pub use waypoint::{LatLon, Waypoint, WaypointId, WaypointUpdate};
