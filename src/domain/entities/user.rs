//! User entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An account that owns places.
///
/// `password` holds the hex-encoded SHA-256 digest, never the plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user, hashing the plain-text password.
    pub fn new(
        email: impl Into<String>,
        password: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            email: email.into(),
            password: hash_password(password),
            first_name,
            last_name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Hex-encoded SHA-256 digest of a password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
