//! Handlers for place endpoints (list, get, create, update, delete, search).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use validator::Validate;

use crate::api::dto::place::{CreatePlaceRequest, PlaceResponse, UpdatePlaceRequest};
use crate::api::dto::search::PlacesSearchRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Raw JSON body; malformed or non-JSON bodies arrive as the rejection so
/// handlers can run their lookups before reporting them.
type JsonBody = Result<Json<Value>, JsonRejection>;

/// Turns a raw body into a typed request.
///
/// A body that is not JSON yields 400 "Not a JSON"; JSON that does not fit
/// `T` yields 400 "Invalid request body" with the serde reason.
fn parse_body<T: DeserializeOwned>(body: JsonBody) -> Result<T, AppError> {
    let Json(value) = body.map_err(|rejection| {
        AppError::bad_request("Not a JSON", json!({ "reason": rejection.body_text() }))
    })?;

    serde_json::from_value(value).map_err(|e| {
        AppError::bad_request("Invalid request body", json!({ "reason": e.to_string() }))
    })
}

/// Lists the places of a city.
///
/// # Endpoint
///
/// `GET /api/v1/cities/{city_id}/places`
///
/// # Errors
///
/// Returns 404 if the city does not exist.
pub async fn list_places_handler(
    Path(city_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PlaceResponse>>, AppError> {
    let places = state.place_service.list_places_by_city(&city_id).await?;

    Ok(Json(places.into_iter().map(PlaceResponse::from).collect()))
}

/// Returns a single place.
///
/// # Endpoint
///
/// `GET /api/v1/places/{place_id}`
///
/// # Errors
///
/// Returns 404 if the place does not exist.
pub async fn get_place_handler(
    Path(place_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PlaceResponse>, AppError> {
    let place = state.place_service.get_place(&place_id).await?;

    Ok(Json(place.into()))
}

/// Deletes a place.
///
/// # Endpoint
///
/// `DELETE /api/v1/places/{place_id}`
///
/// Responds `200 {}` on success.
///
/// # Errors
///
/// Returns 404 if the place does not exist.
pub async fn delete_place_handler(
    Path(place_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    state.place_service.delete_place(&place_id).await?;

    Ok(Json(json!({})))
}

/// Creates a place under a city.
///
/// # Endpoint
///
/// `POST /api/v1/cities/{city_id}/places`
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": "0b8ad5a4-...",   // required
///   "name": "Cozy loft",         // required
///   "number_rooms": 2,           // optional
///   "price_by_night": 120        // optional
/// }
/// ```
///
/// The city id is taken from the path; a `city_id` in the body is ignored.
///
/// # Errors
///
/// Checked in this order: city exists (404), body is JSON (400), `user_id`
/// present (400), user exists (404), `name` present (400), field
/// constraints (400).
pub async fn create_place_handler(
    Path(city_id): Path<String>,
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<PlaceResponse>), AppError> {
    state.place_service.get_city(&city_id).await?;

    let payload: CreatePlaceRequest = parse_body(body)?;

    let place = state
        .place_service
        .create_place(&city_id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(place.into())))
}

/// Updates the writable fields of a place.
///
/// # Endpoint
///
/// `PUT /api/v1/places/{place_id}`
///
/// `id`, `user_id`, `city_id`, `created_at` and `updated_at` in the body are
/// ignored. Unknown keys are rejected.
///
/// # Errors
///
/// Returns 404 if the place does not exist.
/// Returns 400 if the body is not JSON or fails validation.
pub async fn update_place_handler(
    Path(place_id): Path<String>,
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<PlaceResponse>, AppError> {
    state.place_service.get_place(&place_id).await?;

    let payload: UpdatePlaceRequest = parse_body(body)?;
    payload.validate()?;
    payload.validate_nullable()?;

    let place = state
        .place_service
        .update_place(&place_id, payload.into())
        .await?;

    Ok(Json(place.into()))
}

/// Searches places by states, cities and amenities.
///
/// # Endpoint
///
/// `POST /api/v1/places_search`
///
/// # Request Body
///
/// ```json
/// { "states": ["<state id>"], "cities": ["<city id>"], "amenities": ["<amenity id>"] }
/// ```
///
/// Every key is optional; `{}` returns all places. Results never include the
/// `amenities` field.
///
/// # Errors
///
/// Returns 400 if the body is not a JSON object.
pub async fn search_places_handler(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Vec<PlaceResponse>>, AppError> {
    let payload: PlacesSearchRequest = parse_body(body)?;

    let places = state.place_service.search_places(payload.into()).await?;

    Ok(Json(
        places
            .into_iter()
            .map(|p| PlaceResponse::from(p).without_amenities())
            .collect(),
    ))
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> AppError {
    AppError::not_found("Not found", json!({}))
}
