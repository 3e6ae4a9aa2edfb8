//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::PlaceService;
use crate::domain::repositories::Storage;

#[derive(Clone)]
pub struct AppState {
    pub place_service: Arc<PlaceService<dyn Storage>>,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    /// Wires the services around a storage backend.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            place_service: Arc::new(PlaceService::new(storage.clone())),
            storage,
        }
    }
}
