//! Route event expansion.
//!
//! Turns a loaded [`Route`] into one JSON payload per coordinate, in
//! coordinate order, with only the last payload flagged `finished`.

use super::error::RouteError;
use super::types::{OutboundPosition, Route};

/// Build the outbound positions of a route, in coordinate order.
pub fn outbound_positions(route: &Route) -> impl Iterator<Item = OutboundPosition> + '_ {
    let last = route.positions.len().saturating_sub(1);
    route
        .positions
        .iter()
        .enumerate()
        .map(move |(index, coordinate)| OutboundPosition {
            route_id: route.id.clone(),
            client_id: route.client_id.clone(),
            position: coordinate.as_pair(),
            finished: index == last,
        })
}

/// Serialize every position of a route.
///
/// All or nothing: the first position that cannot be encoded fails the
/// whole call. A route without coordinates yields an empty list.
pub fn expand(route: &Route) -> Result<Vec<String>, RouteError> {
    let mut payloads = Vec::with_capacity(route.positions.len());

    for (index, position) in outbound_positions(route).enumerate() {
        if !position.position.iter().all(|v| v.is_finite()) {
            return Err(RouteError::NonFiniteCoordinate {
                route_id: route.id.clone(),
                index,
            });
        }
        payloads.push(serde_json::to_string(&position)?);
    }

    Ok(payloads)
}
