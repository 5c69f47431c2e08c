// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted route editing with undo/redo.

use crate::error::AppError;
use crate::session::RouteConfig;
use strata_route::{CommandInvoker, MoveWaypointCommand, Route, RouteEvent, Waypoint};

/// Build the route, apply every scripted move, then undo them all and redo
/// the first one. Returns the edited route.
pub async fn edit(config: &RouteConfig) -> Result<Route, AppError> {
    let mut route = Route::new();
    route.events().on(|event| match event {
        RouteEvent::WaypointChanged(id) => tracing::debug!("Waypoint changed: {id:?}"),
        RouteEvent::WaypointAdded { index, .. } => tracing::debug!("Waypoint added at {index}"),
        RouteEvent::WaypointRemoved { index, .. } => tracing::debug!("Waypoint removed from {index}"),
    });

    let ids = config
        .waypoints
        .iter()
        .map(|&lat_lon| route.add_waypoint(Waypoint::new(lat_lon)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut invoker = CommandInvoker::new();
    for step in &config.moves {
        let id = *ids.get(step.waypoint).ok_or_else(|| {
            AppError::InvalidSession(format!("no waypoint at index {}", step.waypoint))
        })?;
        invoker
            .execute(MoveWaypointCommand::new(id, step.to), &mut route)?
            .await?;
    }

    while invoker.can_undo() {
        if let Some(description) = invoker.undo_description() {
            tracing::info!("Undo: {description}");
        }
        invoker.undo(&mut route)?.await?;
    }

    if invoker.can_redo() {
        let stats = invoker.stats();
        if let Some(description) = invoker.redo_description() {
            tracing::info!("Redo: {description} ({} more undone)", stats.redo_count - 1);
        }
        invoker.redo(&mut route)?.await?;
    }

    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MoveConfig;
    use strata_route::LatLon;

    #[tokio::test]
    async fn test_edit_keeps_first_move_only() {
        let config = RouteConfig {
            waypoints: vec![LatLon::new(0.0, 0.0), LatLon::new(1.0, 1.0)],
            moves: vec![
                MoveConfig {
                    waypoint: 1,
                    to: LatLon::new(2.0, 2.0),
                },
                MoveConfig {
                    waypoint: 0,
                    to: LatLon::new(3.0, 3.0),
                },
            ],
        };

        let route = edit(&config).await.unwrap();
        let positions: Vec<_> = route.iter().map(|w| w.lat_lon).collect();
        assert_eq!(positions, vec![LatLon::new(0.0, 0.0), LatLon::new(2.0, 2.0)]);
    }

    #[tokio::test]
    async fn test_edit_rejects_unknown_waypoint() {
        let config = RouteConfig {
            waypoints: vec![LatLon::new(0.0, 0.0)],
            moves: vec![MoveConfig {
                waypoint: 4,
                to: LatLon::new(2.0, 2.0),
            }],
        };

        assert!(matches!(edit(&config).await, Err(AppError::InvalidSession(_))));
    }
}
