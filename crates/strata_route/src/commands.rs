// SPDX-License-Identifier: MIT OR Apache-2.0
//! Waypoint editing commands.

use crate::command::RouteCommand;
use crate::error::{CommandError, Result};
use crate::route::Route;
use crate::waypoint::{LatLon, Waypoint, WaypointId, WaypointUpdate};
use strata_signal::CompletionSignal;

/// Waypoint fields as they were before a command changed them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointSnapshot {
    /// Position
    pub lat_lon: LatLon,
    /// Geocoded position; `None` if the waypoint had none
    pub geocoded_lat_lon: Option<LatLon>,
}

impl WaypointSnapshot {
    /// Copy the relevant fields of a waypoint
    pub fn of(waypoint: &Waypoint) -> Self {
        Self {
            lat_lon: waypoint.lat_lon,
            geocoded_lat_lon: waypoint.geocoded_lat_lon,
        }
    }

    /// Update that puts the fields back
    pub fn restore(&self) -> WaypointUpdate {
        WaypointUpdate::new()
            .lat_lon(self.lat_lon)
            .geocoded_lat_lon(self.geocoded_lat_lon)
    }
}

/// Move a waypoint to a new position.
///
/// A manual move invalidates the waypoint's geocoded position, so executing
/// clears it; undo restores both fields.
#[derive(Debug, Clone)]
pub struct MoveWaypointCommand {
    waypoint: WaypointId,
    target: LatLon,
    original: Option<WaypointSnapshot>,
}

impl MoveWaypointCommand {
    /// Create a move command
    pub fn new(waypoint: WaypointId, target: LatLon) -> Self {
        Self {
            waypoint,
            target,
            original: None,
        }
    }

    /// Fields captured before the first execution
    pub fn original(&self) -> Option<&WaypointSnapshot> {
        self.original.as_ref()
    }
}

impl RouteCommand for MoveWaypointCommand {
    fn description(&self) -> String {
        format!("Move waypoint to {}", self.target)
    }

    fn capture_original(&mut self, route: &Route) -> Result<()> {
        let waypoint = route
            .waypoint(self.waypoint)
            .ok_or(CommandError::WaypointNotFound(self.waypoint))?;
        self.original.get_or_insert(WaypointSnapshot::of(waypoint));
        Ok(())
    }

    fn perform_execute(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        route.update_waypoint(
            self.waypoint,
            WaypointUpdate::new()
                .lat_lon(self.target)
                .geocoded_lat_lon(None),
        )?;
        Ok(CompletionSignal::resolved(()))
    }

    fn perform_undo(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        let original = self.original.ok_or(CommandError::NotExecuted)?;
        route.update_waypoint(self.waypoint, original.restore())?;
        Ok(CompletionSignal::resolved(()))
    }
}

/// Insert a new waypoint
#[derive(Debug, Clone)]
pub struct AddWaypointCommand {
    waypoint: Waypoint,
    index: Option<usize>,
}

impl AddWaypointCommand {
    /// Append a waypoint to the end of the route
    pub fn new(waypoint: Waypoint) -> Self {
        Self {
            waypoint,
            index: None,
        }
    }

    /// Insert the waypoint at a position instead
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// ID of the waypoint this command adds
    pub fn waypoint_id(&self) -> WaypointId {
        self.waypoint.id
    }
}

impl RouteCommand for AddWaypointCommand {
    fn description(&self) -> String {
        format!("Add waypoint at {}", self.waypoint.lat_lon)
    }

    fn perform_execute(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        let index = self.index.unwrap_or(route.len());
        route.insert_waypoint(index, self.waypoint.clone())?;
        Ok(CompletionSignal::resolved(()))
    }

    fn perform_undo(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        route.remove_waypoint(self.waypoint.id)?;
        Ok(CompletionSignal::resolved(()))
    }
}

/// Remove a waypoint; undo puts it back where it was
#[derive(Debug, Clone)]
pub struct RemoveWaypointCommand {
    waypoint: WaypointId,
    original: Option<(usize, Waypoint)>,
}

impl RemoveWaypointCommand {
    /// Create a remove command
    pub fn new(waypoint: WaypointId) -> Self {
        Self {
            waypoint,
            original: None,
        }
    }
}

impl RouteCommand for RemoveWaypointCommand {
    fn description(&self) -> String {
        "Remove waypoint".to_string()
    }

    fn capture_original(&mut self, route: &Route) -> Result<()> {
        let missing = || CommandError::WaypointNotFound(self.waypoint);
        let index = route.position(self.waypoint).ok_or_else(missing)?;
        let waypoint = route.waypoint(self.waypoint).cloned().ok_or_else(missing)?;
        self.original.get_or_insert((index, waypoint));
        Ok(())
    }

    fn perform_execute(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        route.remove_waypoint(self.waypoint)?;
        Ok(CompletionSignal::resolved(()))
    }

    fn perform_undo(&mut self, route: &mut Route) -> Result<CompletionSignal<()>> {
        let (index, waypoint) = self.original.clone().ok_or(CommandError::NotExecuted)?;
        route.insert_waypoint(index.min(route.len()), waypoint)?;
        Ok(CompletionSignal::resolved(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::TrackedCommand;
    use futures::executor::block_on;

    fn single(waypoint: Waypoint) -> (Route, WaypointId) {
        let mut route = Route::new();
        let id = route.add_waypoint(waypoint).unwrap();
        (route, id)
    }

    fn move_round_trip(start: LatLon, geocoded: Option<LatLon>, target: LatLon) {
        let mut waypoint = Waypoint::new(start);
        waypoint.geocoded_lat_lon = geocoded;
        let (mut route, id) = single(waypoint.clone());

        let mut command = TrackedCommand::new(MoveWaypointCommand::new(id, target));
        block_on(command.execute(&mut route).unwrap()).unwrap();

        let moved = route.waypoint(id).unwrap();
        assert_eq!(moved.lat_lon, target);
        assert_eq!(moved.geocoded_lat_lon, None);

        block_on(command.undo(&mut route).unwrap()).unwrap();
        assert_eq!(route.waypoint(id), Some(&waypoint));
    }

    #[test]
    fn test_move_restores_geocoded_position() {
        move_round_trip(
            LatLon::new(44.97, -93.26),
            Some(LatLon::new(44.98, -93.27)),
            LatLon::new(45.5, -94.0),
        );
    }

    #[test]
    fn test_move_restores_absent_geocode() {
        move_round_trip(LatLon::new(10.0, 20.0), None, LatLon::new(-10.0, -20.0));
    }

    #[test]
    fn test_move_round_trips_over_many_positions() {
        let positions = [
            LatLon::new(0.0, 0.0),
            LatLon::new(89.9, 179.9),
            LatLon::new(-89.9, -179.9),
            LatLon::new(51.5, -0.12),
        ];
        for start in positions {
            for target in positions {
                move_round_trip(start, None, target);
                move_round_trip(start, Some(target), start);
            }
        }
    }

    #[test]
    fn test_snapshot_is_independent_of_later_edits() {
        let start = LatLon::new(1.0, 1.0);
        let (mut route, id) = single(Waypoint::new(start).with_geocoded(LatLon::new(2.0, 2.0)));
        let mut command = MoveWaypointCommand::new(id, LatLon::new(3.0, 3.0));

        command.capture_original(&route).unwrap();
        command.perform_execute(&mut route).unwrap();
        route
            .update_waypoint(id, WaypointUpdate::new().lat_lon(LatLon::new(7.0, 7.0)))
            .unwrap();

        let original = command.original().unwrap();
        assert_eq!(original.lat_lon, start);
        assert_eq!(original.geocoded_lat_lon, Some(LatLon::new(2.0, 2.0)));
    }

    #[test]
    fn test_move_missing_waypoint_fails() {
        let mut route = Route::new();
        let mut command = TrackedCommand::new(MoveWaypointCommand::new(WaypointId::new(), LatLon::new(0.0, 0.0)));
        assert!(matches!(
            command.execute(&mut route),
            Err(CommandError::WaypointNotFound(_))
        ));
        assert!(!command.is_executed());
    }

    #[test]
    fn test_add_then_undo() {
        let (mut route, first) = single(Waypoint::new(LatLon::new(0.0, 0.0)));
        let added = AddWaypointCommand::new(Waypoint::new(LatLon::new(1.0, 1.0))).at(0);
        let added_id = added.waypoint_id();
        let mut command = TrackedCommand::new(added);

        command.execute(&mut route).unwrap();
        assert_eq!(route.position(added_id), Some(0));
        assert_eq!(route.position(first), Some(1));

        command.undo(&mut route).unwrap();
        assert_eq!(route.len(), 1);
        assert!(route.waypoint(added_id).is_none());
    }

    #[test]
    fn test_remove_then_undo_restores_position() {
        let mut route = Route::new();
        let ids: Vec<_> = (0..3)
            .map(|i| route.add_waypoint(Waypoint::new(LatLon::new(i as f64, 0.0))).unwrap())
            .collect();
        let mut command = TrackedCommand::new(RemoveWaypointCommand::new(ids[1]));

        command.execute(&mut route).unwrap();
        assert_eq!(route.len(), 2);

        command.undo(&mut route).unwrap();
        assert_eq!(route.iter().map(|w| w.id).collect::<Vec<_>>(), ids);
    }
}
