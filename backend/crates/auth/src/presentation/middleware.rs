//! Session Middleware and Route Guards
//!
//! `session_layer` attaches a session to every request and is the only
//! place that resolves the current user. Guards downstream read the
//! resulting [`CurrentSession`] extension and never touch storage.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::ResumeSessionUseCase;
use crate::application::config::AuthConfig;
use crate::application::token;
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{session_id::SessionId, user_id::UserId};

/// Session middleware state
#[derive(Clone)]
pub struct SessionLayerState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> SessionLayerState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

/// The authenticated identity attached to a session, if any
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: String,
}

/// Per-request session snapshot stored in request extensions.
///
/// This is the single source of truth for "who is making this
/// request". It is a read-only snapshot; handlers that need to mutate
/// session state go through the session repository by `session_id`.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session_id: SessionId,
    pub user: Option<CurrentUser>,
}

impl CurrentSession {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }
}

/// Middleware that attaches a session to every request.
///
/// A valid cookie resumes its session row; anything else (no cookie,
/// forged token, expired or unknown session) starts a fresh anonymous
/// row and the response carries the Set-Cookie for it. The Referer
/// header is captured into the session as the back URL.
pub async fn session_layer<R>(
    State(state): State<SessionLayerState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let referrer = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let cookie_value = platform::cookie::extract_cookie(
        req.headers(),
        &state.config.session_cookie_name,
    );

    let use_case = ResumeSessionUseCase::new(state.repo.clone(), state.config.clone());

    let resumed = match &cookie_value {
        Some(value) => match use_case.execute(value, referrer.as_deref()).await {
            Ok(resumed) => resumed,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    let (session, user, is_new) = match resumed {
        Some(resumed) => (resumed.session, resumed.user, false),
        None => {
            let session = match use_case.start_anonymous(referrer.as_deref()).await {
                Ok(session) => session,
                Err(e) => return e.into_response(),
            };
            (session, None, true)
        }
    };

    let current = CurrentSession {
        session_id: session.session_id,
        user: user.map(|u| CurrentUser {
            user_id: u.user_id,
            email: u.email.into_db(),
        }),
    };

    req.extensions_mut().insert(current);

    let mut response = next.run(req).await;

    if is_new {
        set_session_cookie(&mut response, &state.config, &session);
    }

    response
}

fn set_session_cookie(response: &mut Response, config: &AuthConfig, session: &Session) {
    let token = token::generate(session.session_id, &config.session_secret);
    let cookie = config.cookie_config().build_set_cookie(&token);

    match cookie.parse() {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode session cookie header");
        }
    }
}

/// Guard: only authenticated sessions pass; others bounce to the login
/// page.
pub async fn require_authenticated(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<CurrentSession>() {
        Some(current) if current.is_authenticated() => next.run(req).await,
        _ => Redirect::to("/login").into_response(),
    }
}

/// Guard: only anonymous sessions pass; logged-in users bounce home.
pub async fn require_anonymous(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<CurrentSession>() {
        Some(current) if current.is_authenticated() => Redirect::to("/").into_response(),
        _ => next.run(req).await,
    }
}
