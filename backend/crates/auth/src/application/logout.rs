//! Logout Use Case

use std::sync::Arc;

use crate::domain::repository::SessionRepository;
use crate::domain::value_object::session_id::SessionId;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Detach the user from the session.
    ///
    /// The session row itself survives, back to Anonymous. Logging out
    /// an already-anonymous or missing session is a no-op, not an
    /// error.
    pub async fn execute(&self, session_id: SessionId) -> AuthResult<()> {
        let Some(mut session) = self.session_repo.find_by_id(session_id).await? else {
            return Ok(());
        };

        let user_id = session.user_id;
        session.clear_user();
        self.session_repo.update(&session).await?;

        if let Some(user_id) = user_id {
            tracing::info!(
                user_id = %user_id,
                session_id = %session_id,
                "User logged out"
            );
        }

        Ok(())
    }
}
