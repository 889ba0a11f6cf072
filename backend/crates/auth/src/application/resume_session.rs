//! Resume Session Use Case
//!
//! Runs once per request, before routing: turns the session cookie
//! into a session row plus (for authenticated sessions) the owning
//! user. Invalid input never fails the request; it degrades to "no
//! session" and the middleware mints a fresh anonymous one.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token;
use crate::domain::entity::session::Session;
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;

/// A session restored from a request cookie
pub struct ResumedSession {
    pub session: Session,
    /// Present only when the session is authenticated and the user
    /// still exists.
    pub user: Option<User>,
}

/// Resume session use case
pub struct ResumeSessionUseCase<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ResumeSessionUseCase<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Restore the session named by a cookie value, if it is still
    /// live.
    ///
    /// Returns `None` for forged tokens, unknown ids, and expired
    /// rows. Expired rows are deleted on sight. A session whose user
    /// row has since vanished is downgraded to anonymous rather than
    /// rejected.
    pub async fn execute(
        &self,
        cookie_value: &str,
        referrer: Option<&str>,
    ) -> AuthResult<Option<ResumedSession>> {
        let Ok(session_id) = token::parse(cookie_value, &self.config.session_secret) else {
            return Ok(None);
        };

        let Some(mut session) = SessionRepository::find_by_id(&*self.repo, session_id).await?
        else {
            return Ok(None);
        };

        if session.is_expired() {
            self.repo.delete(session_id).await?;
            tracing::debug!(session_id = %session_id, "Expired session discarded");
            return Ok(None);
        }

        let user = match session.user_id {
            Some(user_id) => {
                let found = UserRepository::find_by_id(&*self.repo, &user_id).await?;
                if found.is_none() {
                    // The account was deleted out from under the
                    // session; fall back to anonymous and persist the
                    // downgrade so the row stops naming a dead user.
                    session.clear_user();
                    SessionRepository::update(&*self.repo, &session).await?;
                }
                found
            }
            None => None,
        };

        session.record_referrer(referrer);
        session.touch();

        // Activity bookkeeping happens off the request path, through
        // the narrow update so it can never clobber identity or flash
        // state written by a concurrent request.
        let repo = Arc::clone(&self.repo);
        let session_id = session.session_id;
        let back_url = session.back_url.clone();
        let last_activity_at = session.last_activity_at;
        tokio::spawn(async move {
            if let Err(e) = repo
                .record_activity(session_id, back_url.as_deref(), last_activity_at)
                .await
            {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to record session activity"
                );
            }
        });

        Ok(Some(ResumedSession { session, user }))
    }

    /// Mint a fresh anonymous session.
    pub async fn start_anonymous(&self, referrer: Option<&str>) -> AuthResult<Session> {
        let mut session = Session::new(self.config.session_ttl_chrono());
        session.record_referrer(referrer);
        SessionRepository::create(&*self.repo, &session).await?;
        tracing::debug!(session_id = %session.session_id, "Anonymous session started");
        Ok(session)
    }
}
