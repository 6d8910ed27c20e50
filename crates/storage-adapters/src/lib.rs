//! # storage-adapters
//!
//! `SnapshotStore` implementations. The engine itself is purely in-memory;
//! these adapters give it somewhere durable to put its state.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileSnapshotStore;
pub use memory::MemorySnapshotStore;
