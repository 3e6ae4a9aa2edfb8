//! Business logic services for the application layer.

pub mod place_service;

pub use place_service::{PlaceFilter, PlaceService};
