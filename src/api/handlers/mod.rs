//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod places;

pub use health::health_handler;
pub use places::{
    create_place_handler, delete_place_handler, get_place_handler, list_places_handler,
    not_found_handler, search_places_handler, update_place_handler,
};
