//! State entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic state that groups cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl State {
    /// Creates a new state with a generated id.
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
