//! HTTP Handlers
//!
//! Browser-facing auth routes. Expected failures (bad credentials,
//! taken email, invalid input) become a flash message plus a redirect;
//! only infrastructure failures surface as error responses.

use axum::extract::{Extension, Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::entity::session::Flash;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginForm, LoginPage, RegisterForm, RegisterPage};
use crate::presentation::middleware::CurrentSession;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Login
// ============================================================================

/// GET /login
pub async fn login_page<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentSession>,
) -> AuthResult<Json<LoginPage>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let flash = state.repo.take_flash(current.session_id).await?;

    Ok(Json(LoginPage {
        app_name: kernel::APP_NAME,
        flash: flash.map(Into::into),
    }))
}

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentSession>,
    Form(form): Form<LoginForm>,
) -> AuthResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone());

    let input = LoginInput {
        email: form.email,
        password: form.password,
    };

    match use_case.execute(current.session_id, input).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(e @ (AuthError::InvalidEmail | AuthError::InvalidPassword)) => {
            state
                .repo
                .set_flash(current.session_id, &Flash::error(e.user_message()))
                .await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET /logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentSession>,
) -> AuthResult<Redirect>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.repo.clone());
    use_case.execute(current.session_id).await?;

    Ok(Redirect::to("/login"))
}

// ============================================================================
// Registration
// ============================================================================

/// GET /register
pub async fn register_page<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentSession>,
) -> AuthResult<Json<RegisterPage>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let flash = state.repo.take_flash(current.session_id).await?;

    Ok(Json(RegisterPage {
        app_name: kernel::APP_NAME,
        flash: flash.map(Into::into),
    }))
}

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentSession>,
    Form(form): Form<RegisterForm>,
) -> AuthResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone());

    let input = RegisterInput {
        email: form.email,
        password: form.password,
    };

    match use_case.execute(input).await {
        Ok(_) => {
            state
                .repo
                .set_flash(
                    current.session_id,
                    &Flash::success("Account created, please log in"),
                )
                .await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e @ (AuthError::Validation(_) | AuthError::EmailTaken)) => {
            state
                .repo
                .set_flash(current.session_id, &Flash::error(e.user_message()))
                .await?;
            Ok(Redirect::to("/register").into_response())
        }
        Err(e) => Err(e),
    }
}
