//! Core domain entities of the lodging data model.
//!
//! Entities are plain data structures. Relationships are expressed through id
//! fields (`state_id`, `city_id`, `user_id`, `amenity_ids`) and resolved by the
//! storage layer.
//!
//! # Entity Types
//!
//! - [`State`] - Owns cities
//! - [`City`] - Belongs to a state, owns places
//! - [`User`] - Owns places
//! - [`Amenity`] - Attached to places
//! - [`Place`] - A lodging listing
//!
//! # Design Pattern
//!
//! Places follow the same split as the rest of the model:
//! - [`NewPlace`] - Input for creating a place
//! - [`PlacePatch`] - Partial update of writable fields
//!
//! [`Record`] and [`EntityKind`] let the storage layer stage any entity type
//! through a single `put`/`delete` pair.

pub mod amenity;
pub mod city;
pub mod place;
pub mod record;
pub mod state;
pub mod user;

pub use amenity::Amenity;
pub use city::City;
pub use place::{NewPlace, Place, PlacePatch};
pub use record::{EntityKind, Record};
pub use state::State;
pub use user::User;

/// Generates a fresh entity id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
