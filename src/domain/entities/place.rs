//! Place entity representing a lodging listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A lodging listing owned by a [`super::City`] and a [`super::User`].
///
/// `amenity_ids` is the set of amenities the place offers. Order is kept
/// stable for serialization but carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
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
    #[serde(default)]
    pub amenity_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    /// Creates a place with default attributes and a generated id.
    pub fn new(
        city_id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            city_id: city_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
            amenity_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a place from creation input once owner ids and name are known.
    pub fn from_new(city_id: &str, user_id: &str, name: &str, input: NewPlace) -> Self {
        let mut place = Self::new(city_id, user_id, name);
        place.description = input.description;
        place.number_rooms = input.number_rooms.unwrap_or(0);
        place.number_bathrooms = input.number_bathrooms.unwrap_or(0);
        place.max_guest = input.max_guest.unwrap_or(0);
        place.price_by_night = input.price_by_night.unwrap_or(0);
        place.latitude = input.latitude;
        place.longitude = input.longitude;
        place
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// Ownership (`city_id`, `user_id`), `id` and `created_at` are not part of
    /// [`PlacePatch`] and therefore never change here.
    pub fn apply(&mut self, patch: PlacePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(v) = patch.number_rooms {
            self.number_rooms = v;
        }
        if let Some(v) = patch.number_bathrooms {
            self.number_bathrooms = v;
        }
        if let Some(v) = patch.max_guest {
            self.max_guest = v;
        }
        if let Some(v) = patch.price_by_night {
            self.price_by_night = v;
        }
        if let Some(v) = patch.latitude {
            self.latitude = v;
        }
        if let Some(v) = patch.longitude {
            self.longitude = v;
        }
        self.updated_at = Utc::now();
    }

    /// Whether the place offers every amenity in `amenity_ids`.
    pub fn has_amenities(&self, amenity_ids: &[String]) -> bool {
        amenity_ids.iter().all(|id| self.amenity_ids.contains(id))
    }
}

/// Input data for creating a new place.
///
/// `user_id` and `name` are optional here so the service can report which
/// required field is missing. `user_id` keeps an explicit `null` apart from
/// an absent key: `Some(None)` is a present id that matches no user.
///
/// Field constraints are checked by the service once the owner checks pass.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewPlace {
    pub user_id: Option<Option<String>>,

    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(length(max = 1024))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub number_rooms: Option<i32>,

    #[validate(range(min = 0))]
    pub number_bathrooms: Option<i32>,

    #[validate(range(min = 0))]
    pub max_guest: Option<i32>,

    #[validate(range(min = 0))]
    pub price_by_night: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Partial update of the writable place fields.
///
/// For nullable fields the outer `Option` means "change or not", the inner one
/// is the new value (`None` clears it).
#[derive(Debug, Clone, Default)]
pub struct PlacePatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub number_rooms: Option<i32>,
    pub number_bathrooms: Option<i32>,
    pub max_guest: Option<i32>,
    pub price_by_night: Option<i32>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
}
