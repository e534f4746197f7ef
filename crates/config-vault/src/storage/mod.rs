//! Persistent key-value backends for the encrypted envelope
//!
//! This module provides two backends:
//! 1. In-memory map (tests, ephemeral hosts)
//! 2. JSON file in the user's data directory

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
