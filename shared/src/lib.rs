//! Shared types and domain rules for the warehouse inventory backend
//!
//! Everything in this crate is free of I/O: request payloads, the ledger
//! arithmetic, sale-price derivation, business code generation, expiry windows
//! and daily report aggregation. The backend wires these into PostgreSQL
//! transactions and HTTP handlers.

pub mod codes;
pub mod expiry;
pub mod models;
pub mod pricing;
pub mod reports;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
