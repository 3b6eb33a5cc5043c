//! vertex-api: HTTP API layer for the Vertex client
//!
//! Exposes the live curve state, quotes and trade execution over REST.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::{AppState, Coordinator, Engine};
