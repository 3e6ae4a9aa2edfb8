//! # Places API
//!
//! REST service for lodging places: list them per city, fetch, create, update,
//! delete, and search them by state, city and amenity.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities and the [`domain::repositories::Storage`] trait
//! - **Application Layer** ([`application`]) - Validation order and search logic
//! - **Infrastructure Layer** ([`infrastructure`]) - File-backed and PostgreSQL storage
//! - **API Layer** ([`api`]) - Handlers, DTOs and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! # Seed some data into file.json
//! cargo run --bin admin -- seed demos/seed.json
//!
//! # Start the service
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{PlaceFilter, PlaceService};
    pub use crate::domain::entities::{Amenity, City, EntityKind, Place, Record, State, User};
    pub use crate::domain::repositories::Storage;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{FileStorage, PgStorage};
    pub use crate::state::AppState;
}
