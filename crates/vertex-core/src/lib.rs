//! vertex-core: Shared types, errors, configuration and the ledger interface
//!
//! This crate provides the foundational types used across the Vertex workspace.

pub mod config;
pub mod errors;
pub mod ledger;
pub mod types;

pub use config::*;
pub use errors::*;
pub use ledger::{CurveLedger, ReceiptStatus};
pub use types::*;
