//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - JSON files on the local filesystem for the StateStore port
//! - An in-memory map for ephemeral sessions and tests
//! - Placeholder statement data for files that cannot be parsed

pub mod file_store;
pub mod memory;
pub mod placeholder;

pub use file_store::JsonFileStore;
pub use memory::MemoryStore;
