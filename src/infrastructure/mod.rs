//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`persistence`] - Storage implementations (JSON file, PostgreSQL)

pub mod persistence;
