//! Persistence interface injected into the application services.

use crate::domain::entities::{Amenity, City, EntityKind, Place, Record, State, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Key-indexed object store for the lodging model.
///
/// Writes go through [`Storage::put`] and [`Storage::delete`] and are durable
/// at the latest after [`Storage::save`]. A write that fails reports the error
/// to its own caller. Whether writes reach durable storage before `save` is up
/// to the implementation; callers always call `save` after writing.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileStorage`]
/// - [`crate::infrastructure::persistence::PgStorage`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Finds a state by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_state(&self, id: &str) -> Result<Option<State>, AppError>;

    /// Finds a city by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_city(&self, id: &str) -> Result<Option<City>, AppError>;

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Finds an amenity by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_amenity(&self, id: &str) -> Result<Option<Amenity>, AppError>;

    /// Finds a place by id, with its amenity links loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_place(&self, id: &str) -> Result<Option<Place>, AppError>;

    /// Lists every place, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn all_places(&self) -> Result<Vec<Place>, AppError>;

    /// Lists the cities belonging to a state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn cities_of_state(&self, state_id: &str) -> Result<Vec<City>, AppError>;

    /// Lists the places belonging to a city, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn places_of_city(&self, city_id: &str) -> Result<Vec<Place>, AppError>;

    /// Counts stored objects of one kind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self, kind: EntityKind) -> Result<i64, AppError>;

    /// Stages an insert or a full replacement of a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn put(&self, record: Record) -> Result<(), AppError>;

    /// Stages the removal of a record. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), AppError>;

    /// Commits every staged write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] on constraint violations.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn save(&self) -> Result<(), AppError>;
}
