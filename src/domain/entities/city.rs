//! City entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A city inside a [`super::State`]. Places are listed under cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub state_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    pub fn new(state_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            state_id: state_id.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
