//! Core route data types.

use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// The coordinate as a `[lat, lng]` pair.
    pub fn as_pair(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// A client's route: identifier, requesting client and recorded coordinates.
///
/// Only `routeId` and `clientId` are read from an inbound event; any other
/// fields in the payload are ignored. Coordinates are filled in afterwards
/// by [`PositionReader`](super::PositionReader).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Route {
    /// Route identifier, addresses the coordinate record.
    #[serde(rename = "routeId", default)]
    pub id: String,

    /// Identifier of the client that requested the route.
    #[serde(rename = "clientId", default)]
    pub client_id: String,

    /// Coordinates in record order.
    #[serde(skip)]
    pub positions: Vec<Coordinate>,
}

impl Route {
    /// Create a route skeleton with no coordinates.
    pub fn new(id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            positions: Vec::new(),
        }
    }

    /// Decode the route skeleton from an inbound event body.
    pub fn from_event_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Number of loaded coordinates.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no coordinates are loaded.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// One published position of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundPosition {
    #[serde(rename = "routeId")]
    pub route_id: String,

    #[serde(rename = "clientId")]
    pub client_id: String,

    /// `[latitude, longitude]`
    pub position: [f64; 2],

    /// Set on the last position of the route only.
    pub finished: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_from_event_payload() {
        let route = Route::from_event_payload(br#"{"routeId":"1","clientId":"abc"}"#).unwrap();
        assert_eq!(route.id, "1");
        assert_eq!(route.client_id, "abc");
        assert!(route.is_empty());
    }

    #[test]
    fn test_route_from_event_payload_ignores_position_fields() {
        let payload = br#"{"routeId":"2","clientId":"c","position":[1.0,2.0],"finished":true}"#;
        let route = Route::from_event_payload(payload).unwrap();
        assert_eq!(route, Route::new("2", "c"));
    }

    #[test]
    fn test_route_from_event_payload_missing_fields_default_empty() {
        let route = Route::from_event_payload(br#"{"clientId":"c"}"#).unwrap();
        assert!(route.id.is_empty());
        assert_eq!(route.client_id, "c");
    }

    #[test]
    fn test_route_from_invalid_payload_fails() {
        assert!(Route::from_event_payload(b"not json").is_err());
        assert!(Route::from_event_payload(br#"{"routeId":5}"#).is_err());
    }

    #[test]
    fn test_outbound_position_schema() {
        let position = OutboundPosition {
            route_id: "R1".to_string(),
            client_id: "C1".to_string(),
            position: [20.5, 10.25],
            finished: true,
        };
        assert_eq!(
            serde_json::to_string(&position).unwrap(),
            r#"{"routeId":"R1","clientId":"C1","position":[20.5,10.25],"finished":true}"#
        );
    }

    #[test]
    fn test_coordinate_is_finite() {
        assert!(Coordinate::new(1.0, 2.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 2.0).is_finite());
        assert!(!Coordinate::new(1.0, f64::INFINITY).is_finite());
        assert_eq!(Coordinate::new(1.0, 2.0).as_pair(), [1.0, 2.0]);
    }
}
