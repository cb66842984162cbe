//! Store adapters implementing the workflow persistence port.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileProjectStore;
pub use memory::InMemoryProjectStore;
