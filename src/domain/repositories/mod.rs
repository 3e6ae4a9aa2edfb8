//! Repository trait definitions for the domain layer.
//!
//! The domain talks to persistence through a single [`Storage`] trait: typed
//! lookups per entity, relationship traversal, and a staged write API
//! (`put` / `delete`) committed by `save`.
//!
//! # Implementations
//!
//! - `crate::infrastructure::persistence::FileStorage` - in-memory map with an
//!   optional JSON snapshot file
//! - `crate::infrastructure::persistence::PgStorage` - PostgreSQL
//! - `MockStorage` - generated by `mockall` under `cfg(test)`

pub mod storage;

pub use storage::Storage;

#[cfg(test)]
pub use storage::MockStorage;
