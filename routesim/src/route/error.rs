//! Error types for loading and expanding routes.

use thiserror::Error;

/// Errors that can occur while loading or expanding a route.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The route has no identifier, so no record can be addressed.
    #[error("route id not informed")]
    MissingIdentifier,

    /// The identifier cannot name a record (e.g. contains a path separator).
    #[error("invalid route id '{0}'")]
    InvalidIdentifier(String),

    /// No coordinate record exists for the route.
    #[error("no coordinate record for route '{route_id}'")]
    RecordNotFound {
        route_id: String,
        #[source]
        source: std::io::Error,
    },

    /// The record exists but could not be read.
    #[error("failed to read coordinate record for route '{route_id}'")]
    Io {
        route_id: String,
        #[source]
        source: std::io::Error,
    },

    /// A record line could not be parsed (strict parse mode only).
    #[error("malformed coordinate record for route '{route_id}' at line {line}: '{content}'")]
    MalformedRecord {
        route_id: String,
        line: usize,
        content: String,
    },

    /// A coordinate holds NaN or infinity, which has no JSON encoding.
    #[error("coordinate {index} of route '{route_id}' is not a finite number")]
    NonFiniteCoordinate { route_id: String, index: usize },

    /// JSON encoding of a position payload failed.
    #[error("failed to encode position payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RouteError {
    /// Short machine-friendly label used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteError::MissingIdentifier => "missing_identifier",
            RouteError::InvalidIdentifier(_) => "invalid_identifier",
            RouteError::RecordNotFound { .. } => "record_not_found",
            RouteError::Io { .. } => "io",
            RouteError::MalformedRecord { .. } => "malformed_record",
            RouteError::NonFiniteCoordinate { .. } => "non_finite_coordinate",
            RouteError::Serialization(_) => "serialization",
        }
    }
}
