//! Taskqueue: a project and task workflow core for AI agents.
//!
//! Agents plan work as projects made of ordered tasks, report progress
//! through a status state machine, and wait for a human to approve each
//! completed task before a project can be finalized.
//!
//! # Architecture
//!
//! Taskqueue follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (memory, JSON file)
//!
//! # Modules
//!
//! - [`workflow`]: Projects, tasks, tool-call validation and dispatch
//! - [`config`]: Command-line and environment configuration
//! - [`logging`]: Tracing subscriber setup

pub mod config;
pub mod logging;
pub mod workflow;
