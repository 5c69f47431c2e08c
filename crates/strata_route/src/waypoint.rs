// SPDX-License-Identifier: MIT OR Apache-2.0
//! Route waypoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
}

impl LatLon {
    /// Create a coordinate
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Unique identifier for a waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaypointId(pub Uuid);

impl WaypointId {
    /// Create a new random waypoint ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WaypointId {
    fn default() -> Self {
        Self::new()
    }
}

/// A stop on a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Unique waypoint ID
    pub id: WaypointId,
    /// Current position
    pub lat_lon: LatLon,
    /// Position reported by the last geocode, if it still applies
    pub geocoded_lat_lon: Option<LatLon>,
}

impl Waypoint {
    /// Create a waypoint at a position, without geocode
    pub fn new(lat_lon: LatLon) -> Self {
        Self {
            id: WaypointId::new(),
            lat_lon,
            geocoded_lat_lon: None,
        }
    }

    /// Set the geocoded position
    pub fn with_geocoded(mut self, geocoded: LatLon) -> Self {
        self.geocoded_lat_lon = Some(geocoded);
        self
    }

    /// Apply several field changes at once. Returns whether anything changed.
    pub fn set(&mut self, update: WaypointUpdate) -> bool {
        let mut changed = false;
        if let Some(lat_lon) = update.lat_lon {
            changed |= self.lat_lon != lat_lon;
            self.lat_lon = lat_lon;
        }
        if let Some(geocoded) = update.geocoded_lat_lon {
            changed |= self.geocoded_lat_lon != geocoded;
            self.geocoded_lat_lon = geocoded;
        }
        changed
    }
}

/// Field changes applied together by [`Waypoint::set`].
///
/// `None` leaves a field as it is. For the geocoded position, `Some(None)`
/// clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaypointUpdate {
    /// New position
    pub lat_lon: Option<LatLon>,
    /// New geocoded position, or `Some(None)` to clear it
    pub geocoded_lat_lon: Option<Option<LatLon>>,
}

impl WaypointUpdate {
    /// An update that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position
    pub fn lat_lon(mut self, lat_lon: LatLon) -> Self {
        self.lat_lon = Some(lat_lon);
        self
    }

    /// Set or clear the geocoded position
    pub fn geocoded_lat_lon(mut self, geocoded: Option<LatLon>) -> Self {
        self.geocoded_lat_lon = Some(geocoded);
        self
    }

    /// Check whether the update touches no field
    pub fn is_empty(&self) -> bool {
        self.lat_lon.is_none() && self.geocoded_lat_lon.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_applies_all_fields() {
        let mut waypoint = Waypoint::new(LatLon::new(45.0, -93.0)).with_geocoded(LatLon::new(45.1, -93.1));

        let changed = waypoint.set(
            WaypointUpdate::new()
                .lat_lon(LatLon::new(46.0, -94.0))
                .geocoded_lat_lon(None),
        );

        assert!(changed);
        assert_eq!(waypoint.lat_lon, LatLon::new(46.0, -94.0));
        assert_eq!(waypoint.geocoded_lat_lon, None);
    }

    #[test]
    fn test_empty_update_leaves_fields() {
        let mut waypoint = Waypoint::new(LatLon::new(1.0, 2.0)).with_geocoded(LatLon::new(3.0, 4.0));
        let before = waypoint.clone();

        assert!(WaypointUpdate::new().is_empty());
        assert!(!waypoint.set(WaypointUpdate::new()));
        assert_eq!(waypoint, before);
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let mut waypoint = Waypoint::new(LatLon::new(1.0, 2.0));
        assert!(!waypoint.set(WaypointUpdate::new().lat_lon(LatLon::new(1.0, 2.0))));
    }
}
