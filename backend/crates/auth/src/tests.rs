//! Unit and router tests for the auth crate

mod support {
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    use crate::domain::entity::session::{Flash, Session};
    use crate::domain::entity::user::User;
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::domain::value_object::{email::Email, session_id::SessionId, user_id::UserId};
    use crate::error::{AuthError, AuthResult};

    /// In-memory repository mimicking the PostgreSQL semantics,
    /// including the unique-email violation on create.
    #[derive(Clone, Default)]
    pub struct InMemoryAuthRepository {
        users: Arc<Mutex<HashMap<Uuid, User>>>,
        sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    }

    impl InMemoryAuthRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn user_count(&self) -> usize {
            self.users.lock().unwrap().len()
        }

        pub fn session_user(&self, session_id: SessionId) -> Option<Option<UserId>> {
            self.sessions
                .lock()
                .unwrap()
                .get(&session_id.into_uuid())
                .map(|s| s.user_id)
        }

        pub fn remove_user(&self, user_id: UserId) {
            self.users.lock().unwrap().remove(&user_id.into_uuid());
        }
    }

    impl UserRepository for InMemoryAuthRepository {
        async fn create(&self, user: &User) -> AuthResult<()> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email.as_str() == user.email.as_str()) {
                return Err(AuthError::EmailTaken);
            }
            users.insert(user.user_id.into_uuid(), user.clone());
            Ok(())
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(&user_id.into_uuid()).cloned())
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email.as_str() == email.as_str())
                .cloned())
        }

        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .any(|u| u.email.as_str() == email.as_str()))
        }
    }

    impl SessionRepository for InMemoryAuthRepository {
        async fn create(&self, session: &Session) -> AuthResult<()> {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.session_id.into_uuid(), session.clone());
            Ok(())
        }

        async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<Session>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .get(&session_id.into_uuid())
                .cloned())
        }

        async fn update(&self, session: &Session) -> AuthResult<()> {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.session_id.into_uuid(), session.clone());
            Ok(())
        }

        async fn record_activity(
            &self,
            session_id: SessionId,
            back_url: Option<&str>,
            last_activity_at: DateTime<Utc>,
        ) -> AuthResult<()> {
            let mut sessions = self.sessions.lock().unwrap();
            if let Some(session) = sessions.get_mut(&session_id.into_uuid()) {
                if let Some(back_url) = back_url {
                    session.back_url = Some(back_url.to_string());
                }
                session.last_activity_at = last_activity_at;
            }
            Ok(())
        }

        async fn set_flash(&self, session_id: SessionId, flash: &Flash) -> AuthResult<()> {
            let mut sessions = self.sessions.lock().unwrap();
            if let Some(session) = sessions.get_mut(&session_id.into_uuid()) {
                session.flash = Some(flash.clone());
            }
            Ok(())
        }

        async fn take_flash(&self, session_id: SessionId) -> AuthResult<Option<Flash>> {
            let mut sessions = self.sessions.lock().unwrap();
            Ok(sessions
                .get_mut(&session_id.into_uuid())
                .and_then(|s| s.flash.take()))
        }

        async fn delete(&self, session_id: SessionId) -> AuthResult<()> {
            self.sessions.lock().unwrap().remove(&session_id.into_uuid());
            Ok(())
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|_, s| !s.is_expired());
            Ok((before - sessions.len()) as u64)
        }
    }
}

mod register_tests {
    use std::sync::Arc;

    use crate::application::{RegisterInput, RegisterUseCase};
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::email::Email;
    use crate::error::AuthError;
    use platform::password::ClearTextPassword;

    use super::support::InMemoryAuthRepository;

    fn input(email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_persists_hashed_credentials() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let use_case = RegisterUseCase::new(repo.clone());

        let user = use_case
            .execute(input("user@example.com", "pw123"))
            .await
            .unwrap();

        assert_eq!(user.email.as_str(), "user@example.com");

        let stored = repo
            .find_by_email(&Email::new("user@example.com".to_string()).unwrap())
            .await
            .unwrap()
            .unwrap();

        // Plaintext never persisted; hash verifies the original
        let phc = stored.password_hash.as_phc_string();
        assert!(phc.starts_with("$argon2"));
        assert!(!phc.contains("pw123"));
        let candidate = ClearTextPassword::new("pw123".to_string()).unwrap();
        assert!(stored.verify_password(&candidate));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let use_case = RegisterUseCase::new(repo.clone());

        use_case
            .execute(input("user@example.com", "pw123"))
            .await
            .unwrap();

        let err = use_case
            .execute(input("user@example.com", "other-password"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_register_normalizes_email_case() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let use_case = RegisterUseCase::new(repo.clone());

        use_case
            .execute(input("User@Example.COM", "pw123"))
            .await
            .unwrap();

        let err = use_case
            .execute(input("user@example.com", "pw123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let use_case = RegisterUseCase::new(repo.clone());

        for (email, password) in [
            ("not-an-email", "pw123"),
            ("", "pw123"),
            ("user@example.com", ""),
            ("user@example.com", "   "),
        ] {
            let err = use_case.execute(input(email, password)).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)), "{email:?}/{password:?}");
        }

        assert_eq!(repo.user_count(), 0);
    }
}

mod login_tests {
    use std::sync::Arc;

    use crate::application::config::AuthConfig;
    use crate::application::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
    use crate::domain::entity::session::Session;
    use crate::domain::repository::SessionRepository;
    use crate::error::AuthError;

    use super::support::InMemoryAuthRepository;

    async fn setup() -> (Arc<InMemoryAuthRepository>, Session) {
        let repo = Arc::new(InMemoryAuthRepository::new());

        RegisterUseCase::new(repo.clone())
            .execute(RegisterInput {
                email: "user@example.com".to_string(),
                password: "pw123".to_string(),
            })
            .await
            .unwrap();

        let session = Session::new(AuthConfig::default().session_ttl_chrono());
        SessionRepository::create(&*repo, &session).await.unwrap();

        (repo, session)
    }

    fn input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_attaches_user_to_session() {
        let (repo, session) = setup().await;
        let use_case = LoginUseCase::new(repo.clone(), repo.clone());

        let user = use_case
            .execute(session.session_id, input("user@example.com", "pw123"))
            .await
            .unwrap();

        assert_eq!(repo.session_user(session.session_id), Some(Some(user.user_id)));
    }

    #[tokio::test]
    async fn test_unknown_email_fails_before_password_check() {
        let (repo, session) = setup().await;
        let use_case = LoginUseCase::new(repo.clone(), repo.clone());

        let err = use_case
            .execute(session.session_id, input("nobody@example.com", "pw123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidEmail));
        assert_eq!(repo.session_user(session.session_id), Some(None));
    }

    #[tokio::test]
    async fn test_wrong_password_is_distinguishable_internally() {
        let (repo, session) = setup().await;
        let use_case = LoginUseCase::new(repo.clone(), repo.clone());

        let err = use_case
            .execute(session.session_id, input("user@example.com", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidPassword));
    }

    #[tokio::test]
    async fn test_credential_failures_share_one_user_message() {
        // Neither failure mode may reveal whether the email exists
        assert_eq!(
            AuthError::InvalidEmail.user_message(),
            AuthError::InvalidPassword.user_message()
        );
    }

    #[tokio::test]
    async fn test_login_requires_live_session() {
        let (repo, session) = setup().await;
        SessionRepository::delete(&*repo, session.session_id)
            .await
            .unwrap();

        let use_case = LoginUseCase::new(repo.clone(), repo.clone());
        let err = use_case
            .execute(session.session_id, input("user@example.com", "pw123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::SessionInvalid));
    }
}

mod logout_tests {
    use std::sync::Arc;

    use crate::application::LogoutUseCase;
    use crate::application::config::AuthConfig;
    use crate::domain::entity::session::Session;
    use crate::domain::repository::SessionRepository;
    use crate::domain::value_object::{session_id::SessionId, user_id::UserId};

    use super::support::InMemoryAuthRepository;

    #[tokio::test]
    async fn test_logout_clears_user() {
        let repo = Arc::new(InMemoryAuthRepository::new());

        let mut session = Session::new(AuthConfig::default().session_ttl_chrono());
        session.attach_user(UserId::new());
        SessionRepository::create(&*repo, &session).await.unwrap();

        let use_case = LogoutUseCase::new(repo.clone());
        use_case.execute(session.session_id).await.unwrap();
        assert_eq!(repo.session_user(session.session_id), Some(None));

        // Second logout is a no-op
        use_case.execute(session.session_id).await.unwrap();
        assert_eq!(repo.session_user(session.session_id), Some(None));
    }

    #[tokio::test]
    async fn test_logout_of_unknown_session_is_ok() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let use_case = LogoutUseCase::new(repo.clone());

        use_case.execute(SessionId::new()).await.unwrap();
    }
}

mod resume_tests {
    use std::sync::Arc;

    use crate::application::config::AuthConfig;
    use crate::application::{ResumeSessionUseCase, token};
    use crate::domain::entity::session::Session;
    use crate::domain::repository::SessionRepository;
    use crate::domain::value_object::user_id::UserId;

    use super::support::InMemoryAuthRepository;

    fn use_case(
        repo: &Arc<InMemoryAuthRepository>,
        config: &Arc<AuthConfig>,
    ) -> ResumeSessionUseCase<InMemoryAuthRepository> {
        ResumeSessionUseCase::new(repo.clone(), config.clone())
    }

    #[tokio::test]
    async fn test_resumes_anonymous_session() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());

        let session = use_case(&repo, &config).start_anonymous(None).await.unwrap();
        let cookie = token::generate(session.session_id, &config.session_secret);

        let resumed = use_case(&repo, &config)
            .execute(&cookie, None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resumed.session.session_id, session.session_id);
        assert!(resumed.user.is_none());
    }

    #[tokio::test]
    async fn test_forged_token_yields_no_session() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());

        let session = use_case(&repo, &config).start_anonymous(None).await.unwrap();
        let forged = token::generate(session.session_id, &[9u8; 32]);

        let resumed = use_case(&repo, &config).execute(&forged, None).await.unwrap();
        assert!(resumed.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_deleted() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());

        let session = Session::new(chrono::Duration::milliseconds(-1));
        SessionRepository::create(&*repo, &session).await.unwrap();
        let cookie = token::generate(session.session_id, &config.session_secret);

        let resumed = use_case(&repo, &config).execute(&cookie, None).await.unwrap();
        assert!(resumed.is_none());
        assert_eq!(repo.session_user(session.session_id), None);
    }

    #[tokio::test]
    async fn test_dangling_user_id_degrades_to_anonymous() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());

        let mut session = Session::new(config.session_ttl_chrono());
        let user_id = UserId::new();
        session.attach_user(user_id);
        SessionRepository::create(&*repo, &session).await.unwrap();
        repo.remove_user(user_id);

        let cookie = token::generate(session.session_id, &config.session_secret);
        let resumed = use_case(&repo, &config)
            .execute(&cookie, None)
            .await
            .unwrap()
            .unwrap();

        assert!(resumed.user.is_none());
        assert!(resumed.session.user_id.is_none());

        // The downgrade is written back, not just held in memory
        assert_eq!(repo.session_user(session.session_id), Some(None));
    }

    #[tokio::test]
    async fn test_referrer_is_recorded() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());

        let session = use_case(&repo, &config)
            .start_anonymous(Some("/photos/new"))
            .await
            .unwrap();
        assert_eq!(session.back_url.as_deref(), Some("/photos/new"));

        let cookie = token::generate(session.session_id, &config.session_secret);
        let resumed = use_case(&repo, &config)
            .execute(&cookie, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resumed.session.back_url.as_deref(), Some("/"));
    }
}

mod cleanup_tests {
    use std::sync::Arc;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::session::Session;
    use crate::domain::repository::SessionRepository;

    use super::support::InMemoryAuthRepository;

    #[tokio::test]
    async fn test_sweep_deletes_only_expired_rows() {
        let repo = Arc::new(InMemoryAuthRepository::new());

        let expired = Session::new(chrono::Duration::milliseconds(-1));
        let live = Session::new(AuthConfig::default().session_ttl_chrono());
        SessionRepository::create(&*repo, &expired).await.unwrap();
        SessionRepository::create(&*repo, &live).await.unwrap();

        let deleted = repo.cleanup_expired().await.unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(repo.session_user(expired.session_id), None);
        assert_eq!(repo.session_user(live.session_id), Some(None));
    }

    #[tokio::test]
    async fn test_sweep_of_empty_store_deletes_nothing() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        assert_eq!(repo.cleanup_expired().await.unwrap(), 0);
    }
}

mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode, header};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::presentation::middleware::{SessionLayerState, session_layer};
    use crate::presentation::router::auth_router_generic;

    use super::support::InMemoryAuthRepository;

    fn app(repo: InMemoryAuthRepository, config: AuthConfig) -> Router {
        let state = SessionLayerState::new(Arc::new(repo.clone()), Arc::new(config.clone()));

        auth_router_generic(repo, config).layer(axum::middleware::from_fn_with_state(
            state,
            session_layer::<InMemoryAuthRepository>,
        ))
    }

    fn session_cookie<B>(res: &Response<B>) -> String {
        res.headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
            .unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn location<B>(res: &Response<B>) -> &str {
        res.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap()
    }

    async fn body_json(res: Response<Body>) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_first_request_sets_session_cookie() {
        let app = app(InMemoryAuthRepository::new(), AuthConfig::development());

        let res = app.oneshot(get("/login", None)).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let cookie = session_cookie(&res);
        assert!(cookie.starts_with("session="));

        let page = body_json(res).await;
        assert_eq!(page["appName"], "Photo Gallery");
        assert!(page["flash"].is_null());
    }

    #[tokio::test]
    async fn test_returning_cookie_is_not_reissued() {
        let app = app(InMemoryAuthRepository::new(), AuthConfig::development());

        let first = app.clone().oneshot(get("/login", None)).await.unwrap();
        let cookie = session_cookie(&first);

        let second = app
            .oneshot(get("/login", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        assert!(second.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_failed_login_flashes_generic_message_once() {
        let app = app(InMemoryAuthRepository::new(), AuthConfig::development());

        let first = app.clone().oneshot(get("/login", None)).await.unwrap();
        let cookie = session_cookie(&first);

        let res = app
            .clone()
            .oneshot(post_form(
                "/login",
                Some(&cookie),
                "email=ghost%40example.com&password=pw123",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");

        let page = app
            .clone()
            .oneshot(get("/login", Some(&cookie)))
            .await
            .unwrap();
        let page = body_json(page).await;
        assert_eq!(page["flash"]["kind"], "error");
        assert_eq!(page["flash"]["message"], "Invalid email or password");

        // Flash is one-shot
        let page = app.oneshot(get("/login", Some(&cookie))).await.unwrap();
        let page = body_json(page).await;
        assert!(page["flash"].is_null());
    }

    #[tokio::test]
    async fn test_register_login_logout_flow() {
        let repo = InMemoryAuthRepository::new();
        let app = app(repo.clone(), AuthConfig::development());

        let first = app.clone().oneshot(get("/register", None)).await.unwrap();
        let cookie = session_cookie(&first);

        let res = app
            .clone()
            .oneshot(post_form(
                "/register",
                Some(&cookie),
                "email=user%40example.com&password=pw123",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");
        assert_eq!(repo.user_count(), 1);

        let res = app
            .clone()
            .oneshot(post_form(
                "/login",
                Some(&cookie),
                "email=user%40example.com&password=pw123",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/");

        // Anonymous-only pages now bounce home
        let res = app
            .clone()
            .oneshot(get("/login", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/");

        let res = app
            .clone()
            .oneshot(get("/logout", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");

        // Back to anonymous: logout now redirects to login via the guard
        let res = app.oneshot(get("/logout", Some(&cookie))).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");
    }

    #[tokio::test]
    async fn test_duplicate_registration_flashes_error() {
        let repo = InMemoryAuthRepository::new();
        let app = app(repo.clone(), AuthConfig::development());

        let first = app.clone().oneshot(get("/register", None)).await.unwrap();
        let cookie = session_cookie(&first);

        let form = "email=user%40example.com&password=pw123";
        app.clone()
            .oneshot(post_form("/register", Some(&cookie), form))
            .await
            .unwrap();

        let res = app
            .clone()
            .oneshot(post_form("/register", Some(&cookie), form))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/register");
        assert_eq!(repo.user_count(), 1);

        let page = app
            .oneshot(get("/register", Some(&cookie)))
            .await
            .unwrap();
        let page = body_json(page).await;
        assert_eq!(page["flash"]["kind"], "error");
        assert_eq!(page["flash"]["message"], "That email is already registered");
    }
}
