//! Route model, coordinate record reader and position event expansion.
//!
//! A route is a client's planned path: an identifier, the client that asked
//! for it, and the ordered coordinates recorded for it.
//!
//! # Architecture
//!
//! ```text
//! InboundEvent ──► Route::from_event_payload ──► PositionReader ──► expand()
//!  {routeId,         (id + client id only)        (appends coords     │
//!   clientId}                                       from RouteStore)  ▼
//!                                                          Vec<String> payloads
//!                                                          {routeId, clientId,
//!                                                           position, finished}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use routesim::route::{expand, DirectoryStore, ParseMode, PositionReader, Route};
//!
//! let reader = PositionReader::new(Arc::new(DirectoryStore::new("destinations")), ParseMode::Lenient);
//! let mut route = Route::new("1", "client-a");
//! reader.load_positions(&mut route).await?;
//! for payload in expand(&route)? {
//!     println!("{}", payload);
//! }
//! ```

mod error;
mod expander;
mod reader;
mod store;
mod types;

pub use error::RouteError;
pub use expander::{expand, outbound_positions};
pub use reader::{parse_records, ParseMode, PositionReader};
pub use store::{DirectoryStore, MemoryStore, RouteStore, DEFAULT_DESTINATIONS_DIR, RECORD_EXTENSION};
pub use types::{Coordinate, OutboundPosition, Route};
