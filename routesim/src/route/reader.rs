//! Position store reader.
//!
//! Parses a route's coordinate record into ordered [`Coordinate`]s. Each
//! record line holds `<longitude>,<latitude>`; coordinates are stored as
//! `(latitude, longitude)`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use super::error::RouteError;
use super::store::RouteStore;
use super::types::{Coordinate, Route};

/// How malformed record lines are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Stop at the first malformed line and keep what was parsed before it.
    #[default]
    Lenient,
    /// Fail the whole record on the first malformed line.
    Strict,
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ParseMode::Lenient),
            "strict" => Ok(ParseMode::Strict),
            other => Err(format!("unknown parse mode '{}'", other)),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Lenient => write!(f, "lenient"),
            ParseMode::Strict => write!(f, "strict"),
        }
    }
}

/// Parse one `<lng>,<lat>` line. Fields past the second are ignored.
///
/// Fields are parsed as-is: surrounding whitespace makes a field malformed.
fn parse_line(line: &str) -> Option<Coordinate> {
    let mut fields = line.split(',');
    let longitude = fields.next()?;
    let latitude = fields.next()?;

    let latitude: f64 = latitude.parse().ok()?;
    let longitude: f64 = longitude.parse().ok()?;
    Some(Coordinate::new(latitude, longitude))
}

/// Split record bytes into lines on `\n`, dropping one trailing `\r` per line.
///
/// A final newline does not start an extra empty line.
fn record_lines(record: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = record.strip_suffix(b"\n").unwrap_or(record);
    let lines = if record.is_empty() { None } else { Some(body) };
    lines
        .into_iter()
        .flat_map(|body| body.split(|b| *b == b'\n'))
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Parse record bytes into coordinates, in line order.
///
/// Each line is decoded on its own, so a line that is not valid UTF-8 is
/// treated like any other malformed line. No whitespace trimming is done on
/// fields: `" 11.5"` is malformed.
///
/// In [`ParseMode::Lenient`] a malformed line ends parsing and the
/// coordinates before it are returned without error.
pub fn parse_records(
    route_id: &str,
    record: &[u8],
    mode: ParseMode,
) -> Result<Vec<Coordinate>, RouteError> {
    let mut coordinates = Vec::new();

    for (index, raw) in record_lines(record).enumerate() {
        let parsed = std::str::from_utf8(raw).ok().and_then(parse_line);
        match parsed {
            Some(coordinate) => coordinates.push(coordinate),
            None => match mode {
                ParseMode::Lenient => {
                    debug!(
                        route_id,
                        line = index + 1,
                        kept = coordinates.len(),
                        "Malformed coordinate line, truncating record"
                    );
                    break;
                }
                ParseMode::Strict => {
                    return Err(RouteError::MalformedRecord {
                        route_id: route_id.to_string(),
                        line: index + 1,
                        content: String::from_utf8_lossy(raw).into_owned(),
                    });
                }
            },
        }
    }

    Ok(coordinates)
}

/// Loads route coordinates from a [`RouteStore`].
#[derive(Clone)]
pub struct PositionReader {
    store: Arc<dyn RouteStore>,
    mode: ParseMode,
}

impl fmt::Debug for PositionReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionReader")
            .field("store", &self.store.describe())
            .field("mode", &self.mode)
            .finish()
    }
}

impl PositionReader {
    /// Create a reader over `store`.
    pub fn new(store: Arc<dyn RouteStore>, mode: ParseMode) -> Self {
        Self { store, mode }
    }

    /// The parse mode in use.
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn RouteStore> {
        &self.store
    }

    /// Append the route's recorded coordinates to `route.positions`.
    ///
    /// Existing coordinates are kept. Returns the number appended.
    ///
    /// # Errors
    ///
    /// - [`RouteError::MissingIdentifier`] if the route id is empty; the
    ///   store is not touched.
    /// - Store errors ([`RouteError::RecordNotFound`], [`RouteError::Io`],
    ///   [`RouteError::InvalidIdentifier`]).
    /// - [`RouteError::MalformedRecord`] in strict mode; nothing is appended.
    pub async fn load_positions(&self, route: &mut Route) -> Result<usize, RouteError> {
        if route.id.is_empty() {
            return Err(RouteError::MissingIdentifier);
        }

        let record = self.store.read_record(&route.id).await?;
        let coordinates = parse_records(&route.id, &record, self.mode)?;
        let count = coordinates.len();
        route.positions.extend(coordinates);

        debug!(route_id = %route.id, count, "Loaded route positions");
        Ok(count)
    }
}
