//! In-memory object store with an optional JSON snapshot file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::entities::{Amenity, City, EntityKind, Place, Record, State, User};
use crate::domain::repositories::Storage;
use crate::error::AppError;

/// Every stored object, keyed by id per entity kind.
///
/// This is also the on-disk snapshot format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Objects {
    #[serde(default)]
    states: HashMap<String, State>,
    #[serde(default)]
    cities: HashMap<String, City>,
    #[serde(default)]
    users: HashMap<String, User>,
    #[serde(default)]
    amenities: HashMap<String, Amenity>,
    #[serde(default)]
    places: HashMap<String, Place>,
}

impl Objects {
    fn remove(&mut self, kind: EntityKind, id: &str) {
        match kind {
            EntityKind::State => {
                if self.states.remove(id).is_some() {
                    let city_ids: Vec<String> = self
                        .cities
                        .values()
                        .filter(|c| c.state_id == id)
                        .map(|c| c.id.clone())
                        .collect();
                    for city_id in city_ids {
                        self.remove(EntityKind::City, &city_id);
                    }
                }
            }
            EntityKind::City => {
                if self.cities.remove(id).is_some() {
                    self.places.retain(|_, p| p.city_id != id);
                }
            }
            EntityKind::User => {
                if self.users.remove(id).is_some() {
                    self.places.retain(|_, p| p.user_id != id);
                }
            }
            EntityKind::Amenity => {
                if self.amenities.remove(id).is_some() {
                    for place in self.places.values_mut() {
                        place.amenity_ids.retain(|a| a != id);
                    }
                }
            }
            EntityKind::Place => {
                self.places.remove(id);
            }
        }
    }
}

fn sorted_places<'a>(places: impl Iterator<Item = &'a Place>) -> Vec<Place> {
    let mut out: Vec<Place> = places.cloned().collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    out
}

/// Object store kept in memory.
///
/// Writes are applied to the in-memory map immediately. [`Storage::save`]
/// writes the whole map to the snapshot file when one is configured, and is a
/// no-op for [`FileStorage::in_memory`].
pub struct FileStorage {
    path: Option<PathBuf>,
    objects: RwLock<Objects>,
    /// Serializes snapshot writes; they all go through the same temp file.
    save_lock: Mutex<()>,
}

impl FileStorage {
    /// Creates a store that never touches the filesystem.
    pub fn in_memory() -> Self {
        debug!("Using in-memory storage");
        Self {
            path: None,
            objects: RwLock::new(Objects::default()),
            save_lock: Mutex::new(()),
        }
    }

    /// Opens a store backed by `path`, reloading the snapshot if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the file exists but cannot be read
    /// or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let objects = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Objects>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Objects::default(),
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            places = objects.places.len(),
            "File storage loaded"
        );

        Ok(Self {
            path: Some(path),
            objects: RwLock::new(objects),
            save_lock: Mutex::new(()),
        })
    }

    /// Snapshot file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_state(&self, id: &str) -> Result<Option<State>, AppError> {
        Ok(self.objects.read().await.states.get(id).cloned())
    }

    async fn get_city(&self, id: &str) -> Result<Option<City>, AppError> {
        Ok(self.objects.read().await.cities.get(id).cloned())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.objects.read().await.users.get(id).cloned())
    }

    async fn get_amenity(&self, id: &str) -> Result<Option<Amenity>, AppError> {
        Ok(self.objects.read().await.amenities.get(id).cloned())
    }

    async fn get_place(&self, id: &str) -> Result<Option<Place>, AppError> {
        Ok(self.objects.read().await.places.get(id).cloned())
    }

    async fn all_places(&self) -> Result<Vec<Place>, AppError> {
        let objects = self.objects.read().await;
        Ok(sorted_places(objects.places.values()))
    }

    async fn cities_of_state(&self, state_id: &str) -> Result<Vec<City>, AppError> {
        let objects = self.objects.read().await;
        let mut cities: Vec<City> = objects
            .cities
            .values()
            .filter(|c| c.state_id == state_id)
            .cloned()
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(cities)
    }

    async fn places_of_city(&self, city_id: &str) -> Result<Vec<Place>, AppError> {
        let objects = self.objects.read().await;
        Ok(sorted_places(
            objects.places.values().filter(|p| p.city_id == city_id),
        ))
    }

    async fn count(&self, kind: EntityKind) -> Result<i64, AppError> {
        let objects = self.objects.read().await;
        let n = match kind {
            EntityKind::State => objects.states.len(),
            EntityKind::City => objects.cities.len(),
            EntityKind::User => objects.users.len(),
            EntityKind::Amenity => objects.amenities.len(),
            EntityKind::Place => objects.places.len(),
        };
        Ok(n as i64)
    }

    async fn put(&self, record: Record) -> Result<(), AppError> {
        debug!(kind = record.kind().class_name(), id = record.id(), "Record stored");
        let mut objects = self.objects.write().await;
        match record {
            Record::State(s) => {
                objects.states.insert(s.id.clone(), s);
            }
            Record::City(c) => {
                objects.cities.insert(c.id.clone(), c);
            }
            Record::User(u) => {
                objects.users.insert(u.id.clone(), u);
            }
            Record::Amenity(a) => {
                objects.amenities.insert(a.id.clone(), a);
            }
            Record::Place(p) => {
                objects.places.insert(p.id.clone(), p);
            }
        }
        Ok(())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), AppError> {
        self.objects.write().await.remove(kind, id);
        Ok(())
    }

    async fn save(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self.save_lock.lock().await;

        let bytes = {
            let objects = self.objects.read().await;
            serde_json::to_vec_pretty(&*objects)?
        };

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(path = %path.display(), bytes = bytes.len(), "File storage saved");
        Ok(())
    }
}
