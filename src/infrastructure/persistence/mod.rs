//! Storage implementations.
//!
//! # Backends
//!
//! - [`FileStorage`] - In-memory map, optionally snapshotted to a JSON file
//! - [`PgStorage`] - PostgreSQL via SQLx, writes committed in one transaction

pub mod file_storage;
pub mod pg_storage;

pub use file_storage::FileStorage;
pub use pg_storage::PgStorage;
