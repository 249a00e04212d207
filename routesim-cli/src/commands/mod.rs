//! CLI command implementations.
//!
//! - [`config`] - Configuration management (show, path, init)
//! - [`preview`] - Print a route's payloads without a broker
//! - [`routes`] - List available route ids
//! - [`run`] - Main command (consume events, publish positions)

pub mod common;
pub mod config;
pub mod preview;
pub mod routes;
pub mod run;
