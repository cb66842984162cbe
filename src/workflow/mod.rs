//! Project and task workflow for an agent-facing task queue.
//!
//! A project groups an ordered list of tasks. Tasks move through a small
//! status state machine, need approval once done, and a project can only be
//! finalized when every task is done and approved. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Tool-call validation in [`actions`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - The JSON request/response boundary in [`dispatch`]

pub mod actions;
pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
