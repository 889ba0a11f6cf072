//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{session::Flash, session::Session, user::User};
use crate::domain::value_object::{email::Email, session_id::SessionId, user_id::UserId};
use crate::error::AuthResult;

/// User repository trait (the Credential Store)
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user.
    ///
    /// Email uniqueness is enforced by the store's write-time
    /// constraint; a duplicate fails with `AuthError::EmailTaken`,
    /// including when two registrations race.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by ID
    async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<Session>>;

    /// Update session (identity, flash, referrer, activity)
    async fn update(&self, session: &Session) -> AuthResult<()>;

    /// Record request activity only (referrer and timestamp).
    ///
    /// Deliberately narrow: this runs in the background and must not
    /// overwrite identity or flash state written by a concurrent
    /// request.
    async fn record_activity(
        &self,
        session_id: SessionId,
        back_url: Option<&str>,
        last_activity_at: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Queue a flash message on a session
    async fn set_flash(&self, session_id: SessionId, flash: &Flash) -> AuthResult<()>;

    /// Atomically read and clear the pending flash message
    async fn take_flash(&self, session_id: SessionId) -> AuthResult<Option<Flash>>;

    /// Delete a session
    async fn delete(&self, session_id: SessionId) -> AuthResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
