//! DTOs for place endpoints.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::domain::entities::{NewPlace, Place, PlacePatch};
use crate::error::AppError;

/// Timestamp layout of serialized objects, e.g. `2017-03-25T02:17:06.000000`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

const MAX_DESCRIPTION_LEN: usize = 1024;

/// Request body for `POST /api/v1/cities/{city_id}/places`.
///
/// `user_id` and `name` are required, but typed as optional so that their
/// absence is reported by the service with a dedicated message. A `null`
/// `user_id` counts as present and fails the user lookup.
///
/// Field constraints live on [`NewPlace`] and are checked by the service after
/// the city and owner checks.
///
/// `id`, `city_id`, `created_at`, `updated_at` and `__class__` are accepted
/// and ignored. Any other unknown key is rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePlaceRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub user_id: Option<Option<String>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub number_rooms: Option<i32>,
    pub number_bathrooms: Option<i32>,
    pub max_guest: Option<i32>,
    pub price_by_night: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[serde(default, rename = "id")]
    _id: Option<IgnoredAny>,
    #[serde(default, rename = "city_id")]
    _city_id: Option<IgnoredAny>,
    #[serde(default, rename = "created_at")]
    _created_at: Option<IgnoredAny>,
    #[serde(default, rename = "updated_at")]
    _updated_at: Option<IgnoredAny>,
    #[serde(default, rename = "__class__")]
    _class: Option<IgnoredAny>,
}

impl From<CreatePlaceRequest> for NewPlace {
    fn from(r: CreatePlaceRequest) -> Self {
        NewPlace {
            user_id: r.user_id,
            name: r.name,
            description: r.description,
            number_rooms: r.number_rooms,
            number_bathrooms: r.number_bathrooms,
            max_guest: r.max_guest,
            price_by_night: r.price_by_night,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

/// Request body for `PUT /api/v1/places/{place_id}`.
///
/// Only the fields listed here are writable. `id`, `user_id`, `city_id`,
/// `created_at`, `updated_at` and `__class__` are accepted and ignored; any
/// other key is rejected.
///
/// # Nullable fields
///
/// For `description`, `latitude` and `longitude`:
/// - **Absent** → leave unchanged
/// - **`null`** → clear
/// - **Value** → set
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlaceRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    #[validate(range(min = 0))]
    pub number_rooms: Option<i32>,

    #[validate(range(min = 0))]
    pub number_bathrooms: Option<i32>,

    #[validate(range(min = 0))]
    pub max_guest: Option<i32>,

    #[validate(range(min = 0))]
    pub price_by_night: Option<i32>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub latitude: Option<Option<f64>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub longitude: Option<Option<f64>>,

    #[serde(default, rename = "id")]
    _id: Option<IgnoredAny>,
    #[serde(default, rename = "user_id")]
    _user_id: Option<IgnoredAny>,
    #[serde(default, rename = "city_id")]
    _city_id: Option<IgnoredAny>,
    #[serde(default, rename = "created_at")]
    _created_at: Option<IgnoredAny>,
    #[serde(default, rename = "updated_at")]
    _updated_at: Option<IgnoredAny>,
    #[serde(default, rename = "__class__")]
    _class: Option<IgnoredAny>,
}

impl UpdatePlaceRequest {
    /// Range checks for the nullable fields, which the derive does not cover.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming the offending field.
    pub fn validate_nullable(&self) -> Result<(), AppError> {
        if let Some(Some(description)) = &self.description
            && description.chars().count() > MAX_DESCRIPTION_LEN
        {
            return Err(AppError::bad_request(
                "Validation failed",
                json!({"description": {"max": MAX_DESCRIPTION_LEN}}),
            ));
        }
        if let Some(Some(lat)) = self.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            return Err(AppError::bad_request(
                "Validation failed",
                json!({"latitude": {"min": -90.0, "max": 90.0}}),
            ));
        }
        if let Some(Some(lng)) = self.longitude
            && !(-180.0..=180.0).contains(&lng)
        {
            return Err(AppError::bad_request(
                "Validation failed",
                json!({"longitude": {"min": -180.0, "max": 180.0}}),
            ));
        }
        Ok(())
    }
}

impl From<UpdatePlaceRequest> for PlacePatch {
    fn from(r: UpdatePlaceRequest) -> Self {
        PlacePatch {
            name: r.name,
            description: r.description,
            number_rooms: r.number_rooms,
            number_bathrooms: r.number_bathrooms,
            max_guest: r.max_guest,
            price_by_night: r.price_by_night,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

/// Serialized place as returned by every place endpoint.
#[derive(Debug, Serialize)]
pub struct PlaceResponse {
    #[serde(rename = "__class__")]
    pub class: &'static str,
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub city_id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub number_rooms: i32,
    pub number_bathrooms: i32,
    pub max_guest: i32,
    pub price_by_night: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
}

impl PlaceResponse {
    /// Drops the amenity list from the output.
    pub fn without_amenities(mut self) -> Self {
        self.amenities = None;
        self
    }
}

impl From<Place> for PlaceResponse {
    fn from(p: Place) -> Self {
        PlaceResponse {
            class: "Place",
            id: p.id,
            created_at: p.created_at.format(TIME_FORMAT).to_string(),
            updated_at: p.updated_at.format(TIME_FORMAT).to_string(),
            city_id: p.city_id,
            user_id: p.user_id,
            name: p.name,
            description: p.description,
            number_rooms: p.number_rooms,
            number_bathrooms: p.number_bathrooms,
            max_guest: p.max_guest,
            price_by_night: p.price_by_night,
            latitude: p.latitude,
            longitude: p.longitude,
            amenities: Some(p.amenity_ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_create_request_ignores_immutable_keys() {
        let req: CreatePlaceRequest = serde_json::from_value(json!({
            "user_id": "u1",
            "name": "Loft",
            "id": "forged",
            "city_id": "other",
            "created_at": "2000-01-01T00:00:00.000000",
            "__class__": "Place"
        }))
        .unwrap();

        let input = NewPlace::from(req);
        assert_eq!(input.user_id, Some(Some("u1".to_string())));
        assert_eq!(input.name.as_deref(), Some("Loft"));
    }

    #[test]
    fn test_create_request_rejects_unknown_keys() {
        let res = serde_json::from_value::<CreatePlaceRequest>(json!({
            "user_id": "u1",
            "name": "Loft",
            "swimming_pool": true
        }));
        assert!(res.is_err());
    }

    #[test]
    fn test_create_request_null_user_id_is_present() {
        let req: CreatePlaceRequest =
            serde_json::from_value(json!({"user_id": null, "name": "Loft"})).unwrap();
        assert_eq!(NewPlace::from(req).user_id, Some(None));

        let req: CreatePlaceRequest = serde_json::from_value(json!({"name": "Loft"})).unwrap();
        assert_eq!(NewPlace::from(req).user_id, None);
    }

    #[test]
    fn test_create_request_defers_constraints() {
        let req: CreatePlaceRequest =
            serde_json::from_value(json!({"name": "", "number_rooms": -1})).unwrap();
        let input = NewPlace::from(req);

        assert_eq!(input.name.as_deref(), Some(""));
        assert_eq!(input.number_rooms, Some(-1));
    }

    #[test]
    fn test_update_request_double_option() {
        let req: UpdatePlaceRequest =
            serde_json::from_value(json!({"description": null, "latitude": 12.5})).unwrap();

        assert_eq!(req.description, Some(None));
        assert_eq!(req.latitude, Some(Some(12.5)));
        assert_eq!(req.longitude, None);
    }

    #[test]
    fn test_update_request_ignores_immutable_keys() {
        let req: UpdatePlaceRequest = serde_json::from_value(json!({
            "id": "x",
            "user_id": "x",
            "city_id": "x",
            "created_at": "x",
            "updated_at": "x",
            "max_guest": 8
        }))
        .unwrap();

        let patch = PlacePatch::from(req);
        assert_eq!(patch.max_guest, Some(8));
        assert!(patch.name.is_none());
    }

    #[test]
    fn test_update_request_nullable_ranges() {
        let req: UpdatePlaceRequest = serde_json::from_value(json!({"longitude": 200.0})).unwrap();
        assert!(req.validate_nullable().is_err());

        let req: UpdatePlaceRequest = serde_json::from_value(json!({"longitude": null})).unwrap();
        assert!(req.validate_nullable().is_ok());
    }

    #[test]
    fn test_place_response_format() {
        let mut place = Place::new("c1", "u1", "Loft");
        place.created_at = Utc.with_ymd_and_hms(2017, 3, 25, 2, 17, 6).unwrap();
        place.amenity_ids = vec!["a1".to_string()];

        let value = serde_json::to_value(PlaceResponse::from(place)).unwrap();

        assert_eq!(value["__class__"], "Place");
        assert_eq!(value["created_at"], "2017-03-25T02:17:06.000000");
        assert_eq!(value["amenities"], json!(["a1"]));
        assert_eq!(value["number_rooms"], 0);
    }

    #[test]
    fn test_place_response_without_amenities() {
        let place = Place::new("c1", "u1", "Loft");
        let value =
            serde_json::to_value(PlaceResponse::from(place).without_amenities()).unwrap();

        assert!(value.get("amenities").is_none());
        assert!(value.get("name").is_some());
    }
}
