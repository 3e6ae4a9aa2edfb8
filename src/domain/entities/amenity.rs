//! Amenity entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A facility a place can offer (Wifi, Pool, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
