//! Login Use Case
//!
//! Authenticates a user and attaches the identity to the caller's
//! session row.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, session_id::SessionId};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
}

impl<U, S> LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            session_repo,
        }
    }

    /// Authenticate and transition the session to Authenticated.
    ///
    /// The existence check runs before any password work: a missing
    /// account fails as `InvalidEmail`, a present account with a bad
    /// password as `InvalidPassword`. The two are distinguishable to
    /// callers but share one user-facing message.
    pub async fn execute(&self, session_id: SessionId, input: LoginInput) -> AuthResult<User> {
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidEmail)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidEmail)?;

        let candidate = ClearTextPassword::new(input.password)
            .map_err(|_| AuthError::InvalidPassword)?;

        if !user.verify_password(&candidate) {
            return Err(AuthError::InvalidPassword);
        }

        let mut session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        session.attach_user(user.user_id);
        self.session_repo.update(&session).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session_id,
            "User logged in"
        );

        Ok(user)
    }
}
