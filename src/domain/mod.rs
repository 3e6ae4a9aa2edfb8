//! Domain layer containing business entities and the storage contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (State, City, User, Amenity, Place)
//! - [`repositories`] - The [`repositories::Storage`] trait
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - The storage trait is implemented by the infrastructure layer
//! - Business logic lives in services (see [`crate::application::services`])

pub mod entities;
pub mod repositories;
