//! User Entity
//!
//! A credential store entry: identity plus password hash. The hash is
//! produced before construction; no plaintext ever enters this type.

use chrono::{DateTime, Utc};
use platform::password::{ClearTextPassword, HashedPassword};

use crate::domain::value_object::{email::Email, user_id::UserId};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier, assigned at creation, immutable
    pub user_id: UserId,
    /// Login identifier (unique, validated, lowercased)
    pub email: Email,
    /// Argon2id PHC hash, the only stored password representation
    pub password_hash: HashedPassword,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user from an already-hashed password
    pub fn new(email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Verify a candidate password against the stored hash
    pub fn verify_password(&self, candidate: &ClearTextPassword) -> bool {
        self.password_hash.verify(candidate)
    }
}
