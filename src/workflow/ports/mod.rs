//! Port contracts for workflow persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by workflow services.

pub mod store;

pub use store::{ProjectStore, StoreError, StoreResult, check_next_version};
