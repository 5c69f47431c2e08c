// SPDX-License-Identifier: MIT OR Apache-2.0
//! Routes made of ordered waypoints.

use crate::error::{CommandError, Result};
use crate::waypoint::{Waypoint, WaypointId, WaypointUpdate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strata_signal::EventEmitter;
use uuid::Uuid;

/// Unique identifier for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteId(pub Uuid);

impl RouteId {
    /// Create a new random route ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self::new()
    }
}

/// Changes made to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEvent {
    /// A waypoint was inserted at `index`
    WaypointAdded {
        /// Waypoint ID
        id: WaypointId,
        /// Position in the route
        index: usize,
    },
    /// A waypoint was removed from `index`
    WaypointRemoved {
        /// Waypoint ID
        id: WaypointId,
        /// Former position in the route
        index: usize,
    },
    /// A waypoint's fields changed
    WaypointChanged(WaypointId),
}

/// An ordered list of waypoints
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Route {
    /// Unique route ID
    pub id: RouteId,
    waypoints: IndexMap<WaypointId, Waypoint>,
    #[serde(skip)]
    events: EventEmitter<RouteEvent>,
}

impl Route {
    /// Create an empty route
    pub fn new() -> Self {
        Self::default()
    }

    /// Change notifications
    pub fn events(&self) -> &EventEmitter<RouteEvent> {
        &self.events
    }

    /// Append a waypoint
    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> Result<WaypointId> {
        self.insert_waypoint(self.waypoints.len(), waypoint)
    }

    /// Insert a waypoint at `index`, shifting later waypoints back
    pub fn insert_waypoint(&mut self, index: usize, waypoint: Waypoint) -> Result<WaypointId> {
        let id = waypoint.id;
        if self.waypoints.contains_key(&id) {
            return Err(CommandError::InvalidOperation(format!(
                "Waypoint already on route: {id:?}"
            )));
        }
        if index > self.waypoints.len() {
            return Err(CommandError::InvalidOperation(format!(
                "Waypoint index {index} out of bounds for {} waypoints",
                self.waypoints.len()
            )));
        }

        self.waypoints.shift_insert(index, id, waypoint);
        self.events.emit(&RouteEvent::WaypointAdded { id, index });
        Ok(id)
    }

    /// Remove a waypoint, returning its former index and value
    pub fn remove_waypoint(&mut self, id: WaypointId) -> Result<(usize, Waypoint)> {
        let (index, _, waypoint) = self
            .waypoints
            .shift_remove_full(&id)
            .ok_or(CommandError::WaypointNotFound(id))?;
        self.events.emit(&RouteEvent::WaypointRemoved { id, index });
        Ok((index, waypoint))
    }

    /// Apply a bulk update to one waypoint. Returns whether anything changed.
    pub fn update_waypoint(&mut self, id: WaypointId, update: WaypointUpdate) -> Result<bool> {
        let waypoint = self
            .waypoints
            .get_mut(&id)
            .ok_or(CommandError::WaypointNotFound(id))?;
        let changed = waypoint.set(update);
        if changed {
            self.events.emit(&RouteEvent::WaypointChanged(id));
        }
        Ok(changed)
    }

    /// Get a waypoint
    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(&id)
    }

    /// Index of a waypoint
    pub fn position(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.get_index_of(&id)
    }

    /// Waypoints in route order
    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.values()
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check whether the route has no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Deserialize from RON
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }
}
