//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::Storage`] trait and
//! provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::place_service::PlaceService`] - Place CRUD and search

pub mod services;
