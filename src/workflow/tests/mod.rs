//! Unit tests for the workflow module.

mod status_tests;
mod store_tests;
