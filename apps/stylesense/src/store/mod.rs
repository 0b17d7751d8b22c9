//! Persistence Adapter and the key-value backends beneath it.

pub mod kv;
pub mod persistence;

pub use kv::{FileStore, StoreError};
#[cfg(test)]
pub use kv::MemoryStore;
pub use persistence::StyleStore;
