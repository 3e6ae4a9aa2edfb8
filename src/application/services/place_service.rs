//! Place management service.

use crate::domain::entities::{City, EntityKind, NewPlace, Place, PlacePatch};
use crate::domain::repositories::Storage;
use crate::error::AppError;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Search criteria for [`PlaceService::search_places`].
///
/// Empty lists mean "no filter on this dimension".
#[derive(Debug, Clone, Default)]
pub struct PlaceFilter {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub amenities: Vec<String>,
}

impl PlaceFilter {
    /// True when no dimension is filtered.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.cities.is_empty() && self.amenities.is_empty()
    }
}

/// Service for listing, creating, updating, deleting and searching places.
///
/// Every operation validates its inputs in a fixed order and aborts on the
/// first failure, before any write is staged. Successful writes end with
/// exactly one [`Storage::save`].
pub struct PlaceService<S: Storage + ?Sized> {
    storage: Arc<S>,
}

impl<S: Storage + ?Sized> PlaceService<S> {
    /// Creates a new place service.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Retrieves a city by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the city does not exist.
    pub async fn get_city(&self, city_id: &str) -> Result<City, AppError> {
        self.storage
            .get_city(city_id)
            .await?
            .ok_or_else(|| AppError::not_found("City not found", json!({"city_id": city_id})))
    }

    /// Lists the places of a city.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the city does not exist.
    pub async fn list_places_by_city(&self, city_id: &str) -> Result<Vec<Place>, AppError> {
        let city = self.get_city(city_id).await?;
        self.storage.places_of_city(&city.id).await
    }

    /// Retrieves a place by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the place does not exist.
    pub async fn get_place(&self, place_id: &str) -> Result<Place, AppError> {
        self.storage
            .get_place(place_id)
            .await?
            .ok_or_else(|| AppError::not_found("Place not found", json!({"place_id": place_id})))
    }

    /// Deletes a place.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the place does not exist.
    pub async fn delete_place(&self, place_id: &str) -> Result<(), AppError> {
        let place = self.get_place(place_id).await?;

        self.storage.delete(EntityKind::Place, &place.id).await?;
        self.storage.save().await?;

        info!(place_id = %place.id, "Place deleted");
        Ok(())
    }

    /// Creates a place under a city.
    ///
    /// # Validation Order
    ///
    /// 1. City exists (404)
    /// 2. `user_id` present (400 "Missing user_id")
    /// 3. User exists (404, also for a `null` id)
    /// 4. `name` present (400 "Missing name")
    /// 5. Field constraints (400 "Validation failed")
    ///
    /// The city id always comes from the path, never from the input.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the city or the user does not exist.
    /// Returns [`AppError::Validation`] if `user_id` or `name` is missing, or
    /// a field is out of range.
    pub async fn create_place(&self, city_id: &str, input: NewPlace) -> Result<Place, AppError> {
        let city = self.get_city(city_id).await?;

        let user_id = input
            .user_id
            .clone()
            .ok_or_else(|| AppError::bad_request("Missing user_id", json!({"field": "user_id"})))?;

        let user = match user_id.as_deref() {
            Some(id) => self.storage.get_user(id).await?,
            None => None,
        }
        .ok_or_else(|| AppError::not_found("User not found", json!({"user_id": user_id})))?;

        let name = input
            .name
            .clone()
            .ok_or_else(|| AppError::bad_request("Missing name", json!({"field": "name"})))?;

        input.validate()?;

        let place = Place::from_new(&city.id, &user.id, &name, input);

        self.storage.put(place.clone().into()).await?;
        self.storage.save().await?;

        info!(place_id = %place.id, city_id = %city.id, user_id = %user.id, "Place created");
        Ok(place)
    }

    /// Applies a partial update to a place.
    ///
    /// Owner ids are never re-validated here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the place does not exist.
    pub async fn update_place(&self, place_id: &str, patch: PlacePatch) -> Result<Place, AppError> {
        let mut place = self.get_place(place_id).await?;

        place.apply(patch);

        self.storage.put(place.clone().into()).await?;
        self.storage.save().await?;

        debug!(place_id = %place.id, "Place updated");
        Ok(place)
    }

    /// Searches places by state, city and amenity.
    ///
    /// # Algorithm
    ///
    /// - No filter at all: every place.
    /// - Places of every city of each known state, then places of each known
    ///   city, deduplicated by id. Unknown ids are skipped.
    /// - Amenities narrow the candidates (or every place, when the state and
    ///   city filters yielded nothing) to places offering all of them. An
    ///   unknown amenity id matches no place.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn search_places(&self, filter: PlaceFilter) -> Result<Vec<Place>, AppError> {
        if filter.is_empty() {
            return self.storage.all_places().await;
        }

        let mut seen = HashSet::new();
        let mut places = Vec::new();

        for state_id in &filter.states {
            if self.storage.get_state(state_id).await?.is_none() {
                debug!(state_id = %state_id, "Search skips unknown state");
                continue;
            }
            for city in self.storage.cities_of_state(state_id).await? {
                for place in self.storage.places_of_city(&city.id).await? {
                    if seen.insert(place.id.clone()) {
                        places.push(place);
                    }
                }
            }
        }

        for city_id in &filter.cities {
            if self.storage.get_city(city_id).await?.is_none() {
                debug!(city_id = %city_id, "Search skips unknown city");
                continue;
            }
            for place in self.storage.places_of_city(city_id).await? {
                if seen.insert(place.id.clone()) {
                    places.push(place);
                }
            }
        }

        if !filter.amenities.is_empty() {
            for amenity_id in &filter.amenities {
                if self.storage.get_amenity(amenity_id).await?.is_none() {
                    debug!(amenity_id = %amenity_id, "Search on unknown amenity");
                    return Ok(Vec::new());
                }
            }

            if places.is_empty() {
                places = self.storage.all_places().await?;
            }
            places.retain(|p| p.has_amenities(&filter.amenities));
        }

        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Amenity, Record, State, User};
    use crate::domain::repositories::MockStorage;

    fn city(id: &str, state_id: &str) -> City {
        let mut c = City::new(state_id, "Town");
        c.id = id.to_string();
        c
    }

    fn place(id: &str, city_id: &str, amenities: &[&str]) -> Place {
        let mut p = Place::new(city_id, "u1", format!("Place {id}"));
        p.id = id.to_string();
        p.amenity_ids = amenities.iter().map(|a| a.to_string()).collect();
        p
    }

    fn user(id: &str) -> User {
        let mut u = User::new("owner@example.com", "pw", None, None);
        u.id = id.to_string();
        u
    }

    fn ids(places: &[Place]) -> Vec<&str> {
        places.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_places_by_city_not_found() {
        let mut mock = MockStorage::new();
        mock.expect_get_city().times(1).returning(|_| Ok(None));
        mock.expect_places_of_city().never();

        let service = PlaceService::new(Arc::new(mock));
        let result = service.list_places_by_city("missing").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_places_by_city_success() {
        let mut mock = MockStorage::new();
        mock.expect_get_city()
            .withf(|id| id == "c1")
            .returning(|_| Ok(Some(city("c1", "s1"))));
        mock.expect_places_of_city()
            .withf(|id| id == "c1")
            .times(1)
            .returning(|_| Ok(vec![place("p1", "c1", &[]), place("p2", "c1", &[])]));

        let service = PlaceService::new(Arc::new(mock));
        let places = service.list_places_by_city("c1").await.unwrap();

        assert_eq!(ids(&places), vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_delete_place_not_found_does_not_save() {
        let mut mock = MockStorage::new();
        mock.expect_get_place().returning(|_| Ok(None));
        mock.expect_delete().never();
        mock.expect_save().never();

        let service = PlaceService::new(Arc::new(mock));
        let result = service.delete_place("nope").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_place_success() {
        let mut mock = MockStorage::new();
        mock.expect_get_place()
            .returning(|_| Ok(Some(place("p1", "c1", &[]))));
        mock.expect_delete()
            .withf(|kind, id| *kind == EntityKind::Place && id == "p1")
            .times(1)
            .returning(|_, _| Ok(()));
        mock.expect_save().times(1).returning(|| Ok(()));

        let service = PlaceService::new(Arc::new(mock));

        assert!(service.delete_place("p1").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_place_city_checked_first() {
        let mut mock = MockStorage::new();
        mock.expect_get_city().returning(|_| Ok(None));
        mock.expect_get_user().never();
        mock.expect_put().never();

        let service = PlaceService::new(Arc::new(mock));
        let result = service.create_place("nope", NewPlace::default()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_place_missing_user_id() {
        let mut mock = MockStorage::new();
        mock.expect_get_city()
            .returning(|_| Ok(Some(city("c1", "s1"))));
        mock.expect_get_user().never();

        let service = PlaceService::new(Arc::new(mock));
        let input = NewPlace {
            name: Some("Loft".to_string()),
            ..Default::default()
        };
        let err = service.create_place("c1", input).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_string(), "Missing user_id");
    }

    #[tokio::test]
    async fn test_create_place_unknown_user_before_missing_name() {
        let mut mock = MockStorage::new();
        mock.expect_get_city()
            .returning(|_| Ok(Some(city("c1", "s1"))));
        mock.expect_get_user().returning(|_| Ok(None));

        let service = PlaceService::new(Arc::new(mock));
        let input = NewPlace {
            user_id: Some(Some("ghost".to_string())),
            ..Default::default()
        };
        let err = service.create_place("c1", input).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_place_missing_name() {
        let mut mock = MockStorage::new();
        mock.expect_get_city()
            .returning(|_| Ok(Some(city("c1", "s1"))));
        mock.expect_get_user()
            .returning(|_| Ok(Some(user("u1"))));
        mock.expect_put().never();

        let service = PlaceService::new(Arc::new(mock));
        let input = NewPlace {
            user_id: Some(Some("u1".to_string())),
            ..Default::default()
        };
        let err = service.create_place("c1", input).await.unwrap_err();

        assert_eq!(err.to_string(), "Missing name");
    }

    #[tokio::test]
    async fn test_create_place_null_user_id_not_found() {
        let mut mock = MockStorage::new();
        mock.expect_get_city()
            .returning(|_| Ok(Some(city("c1", "s1"))));
        mock.expect_get_user().never();
        mock.expect_put().never();

        let service = PlaceService::new(Arc::new(mock));
        let input = NewPlace {
            user_id: Some(None),
            name: Some("Loft".to_string()),
            ..Default::default()
        };
        let err = service.create_place("c1", input).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_place_constraints_checked_last() {
        let mut mock = MockStorage::new();
        mock.expect_get_city()
            .returning(|_| Ok(Some(city("c1", "s1"))));
        mock.expect_get_user().returning(|_| Ok(None));
        mock.expect_put().never();

        let service = PlaceService::new(Arc::new(mock));
        let input = NewPlace {
            user_id: Some(Some("ghost".to_string())),
            name: Some(String::new()),
            ..Default::default()
        };
        let err = service.create_place("c1", input).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_place_invalid_fields() {
        let mut mock = MockStorage::new();
        mock.expect_get_city()
            .returning(|_| Ok(Some(city("c1", "s1"))));
        mock.expect_get_user()
            .returning(|_| Ok(Some(user("u1"))));
        mock.expect_put().never();
        mock.expect_save().never();

        let service = PlaceService::new(Arc::new(mock));
        let input = NewPlace {
            user_id: Some(Some("u1".to_string())),
            name: Some("Loft".to_string()),
            max_guest: Some(-1),
            ..Default::default()
        };
        let err = service.create_place("c1", input).await.unwrap_err();

        assert_eq!(err.to_string(), "Validation failed");
    }

    #[tokio::test]
    async fn test_create_place_success() {
        let mut mock = MockStorage::new();
        mock.expect_get_city()
            .returning(|_| Ok(Some(city("c1", "s1"))));
        mock.expect_get_user()
            .withf(|id| id == "u1")
            .returning(|_| Ok(Some(user("u1"))));
        mock.expect_put()
            .withf(|r| matches!(r, Record::Place(p) if p.city_id == "c1" && p.user_id == "u1"))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_save().times(1).returning(|| Ok(()));

        let service = PlaceService::new(Arc::new(mock));
        let input = NewPlace {
            user_id: Some(Some("u1".to_string())),
            name: Some("Loft".to_string()),
            max_guest: Some(4),
            ..Default::default()
        };
        let place = service.create_place("c1", input).await.unwrap();

        assert_eq!(place.city_id, "c1");
        assert_eq!(place.name, "Loft");
        assert_eq!(place.max_guest, 4);
    }

    #[tokio::test]
    async fn test_update_place_keeps_owners() {
        let mut mock = MockStorage::new();
        mock.expect_get_place()
            .returning(|_| Ok(Some(place("p1", "c1", &[]))));
        mock.expect_put()
            .withf(|r| matches!(r, Record::Place(p) if p.name == "Renamed" && p.city_id == "c1"))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_save().times(1).returning(|| Ok(()));

        let service = PlaceService::new(Arc::new(mock));
        let patch = PlacePatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = service.update_place("p1", patch).await.unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.user_id, "u1");
    }

    #[tokio::test]
    async fn test_search_empty_filter_returns_all() {
        let mut mock = MockStorage::new();
        mock.expect_all_places()
            .times(1)
            .returning(|| Ok(vec![place("p1", "c1", &[]), place("p2", "c2", &[])]));

        let service = PlaceService::new(Arc::new(mock));
        let places = service.search_places(PlaceFilter::default()).await.unwrap();

        assert_eq!(places.len(), 2);
    }

    #[tokio::test]
    async fn test_search_state_and_city_deduplicates() {
        let mut mock = MockStorage::new();
        mock.expect_get_state()
            .returning(|_| Ok(Some(State::new("S"))));
        mock.expect_cities_of_state()
            .returning(|_| Ok(vec![city("c1", "s1"), city("c2", "s1")]));
        mock.expect_get_city()
            .returning(|id| Ok(Some(city(id, "s1"))));
        mock.expect_places_of_city().returning(|id| match id {
            "c1" => Ok(vec![place("p1", "c1", &[])]),
            "c2" => Ok(vec![place("p2", "c2", &[])]),
            _ => Ok(vec![place("p3", "c3", &[])]),
        });

        let service = PlaceService::new(Arc::new(mock));
        let filter = PlaceFilter {
            states: vec!["s1".to_string()],
            cities: vec!["c1".to_string(), "c3".to_string()],
            ..Default::default()
        };
        let places = service.search_places(filter).await.unwrap();

        assert_eq!(ids(&places), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_search_amenities_only_filters_all_places() {
        let mut mock = MockStorage::new();
        mock.expect_get_amenity()
            .returning(|_| Ok(Some(Amenity::new("Wifi"))));
        mock.expect_all_places().times(1).returning(|| {
            Ok(vec![
                place("p1", "c1", &["a1", "a2"]),
                place("p2", "c1", &["a1"]),
                place("p3", "c2", &["a2", "a1", "a3"]),
            ])
        });

        let service = PlaceService::new(Arc::new(mock));
        let filter = PlaceFilter {
            amenities: vec!["a1".to_string(), "a2".to_string()],
            ..Default::default()
        };
        let places = service.search_places(filter).await.unwrap();

        assert_eq!(ids(&places), vec!["p1", "p3"]);
    }

    #[tokio::test]
    async fn test_search_unknown_amenity_matches_nothing() {
        let mut mock = MockStorage::new();
        mock.expect_get_amenity().returning(|_| Ok(None));
        mock.expect_all_places().never();

        let service = PlaceService::new(Arc::new(mock));
        let filter = PlaceFilter {
            amenities: vec!["nope".to_string()],
            ..Default::default()
        };

        assert!(service.search_places(filter).await.unwrap().is_empty());
    }
}
