//! API route configuration.

use crate::api::handlers::{
    create_place_handler, delete_place_handler, get_place_handler, list_places_handler,
    search_places_handler, update_place_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Place routes, nested under `/api/v1` by [`crate::routes::app_router`].
///
/// # Endpoints
///
/// - `GET    /cities/{city_id}/places` - List places of a city
/// - `POST   /cities/{city_id}/places` - Create a place in a city
/// - `GET    /places/{place_id}`       - Fetch a place
/// - `PUT    /places/{place_id}`       - Update a place
/// - `DELETE /places/{place_id}`       - Delete a place
/// - `POST   /places_search`           - Search places by state, city, amenity
pub fn place_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cities/{city_id}/places",
            get(list_places_handler).post(create_place_handler),
        )
        .route(
            "/places/{place_id}",
            get(get_place_handler)
                .put(update_place_handler)
                .delete(delete_place_handler),
        )
        .route("/places_search", post(search_places_handler))
}
