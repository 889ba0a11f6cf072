//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::session::{Flash, FlashKind, Session};
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, session_id::SessionId, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(e: sqlx::Error) -> AuthError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AuthError::EmailTaken
        }
        _ => AuthError::Database(e),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                user_id,
                flash_kind,
                flash_message,
                back_url,
                expires_at_ms,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.user_id.map(|id| id.into_uuid()))
        .bind(session.flash.as_ref().map(|f| f.kind.as_str()))
        .bind(session.flash.as_ref().map(|f| f.message.as_str()))
        .bind(&session.back_url)
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                flash_kind,
                flash_message,
                back_url,
                expires_at_ms,
                created_at,
                last_activity_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    async fn update(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions SET
                user_id = $2,
                flash_kind = $3,
                flash_message = $4,
                back_url = $5,
                expires_at_ms = $6,
                last_activity_at = $7
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.user_id.map(|id| id.into_uuid()))
        .bind(session.flash.as_ref().map(|f| f.kind.as_str()))
        .bind(session.flash.as_ref().map(|f| f.message.as_str()))
        .bind(&session.back_url)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_activity(
        &self,
        session_id: SessionId,
        back_url: Option<&str>,
        last_activity_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions SET
                back_url = COALESCE($2, back_url),
                last_activity_at = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(back_url)
        .bind(last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_flash(&self, session_id: SessionId, flash: &Flash) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions SET
                flash_kind = $2,
                flash_message = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(flash.kind.as_str())
        .bind(&flash.message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn take_flash(&self, session_id: SessionId) -> AuthResult<Option<Flash>> {
        // Read-and-clear in one statement so two concurrent renders
        // cannot both observe the same flash.
        let row = sqlx::query_as::<_, FlashRow>(
            r#"
            UPDATE sessions s SET
                flash_kind = NULL,
                flash_message = NULL
            FROM (
                SELECT session_id, flash_kind, flash_message
                FROM sessions
                WHERE session_id = $1
                FOR UPDATE
            ) old
            WHERE s.session_id = old.session_id
            RETURNING old.flash_kind, old.flash_message
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(FlashRow::into_flash))
    }

    async fn delete(&self, session_id: SessionId) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = platform::password::HashedPassword::from_phc_string(
            self.password_hash,
        )
        .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Option<Uuid>,
    flash_kind: Option<String>,
    flash_message: Option<String>,
    back_url: Option<String>,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        let flash = match (self.flash_kind, self.flash_message) {
            (Some(kind), Some(message)) => FlashKind::from_str(&kind)
                .map(|kind| Flash { kind, message }),
            _ => None,
        };

        Session {
            session_id: SessionId::from_uuid(self.session_id),
            user_id: self.user_id.map(UserId::from_uuid),
            flash,
            back_url: self.back_url,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FlashRow {
    flash_kind: Option<String>,
    flash_message: Option<String>,
}

impl FlashRow {
    fn into_flash(self) -> Option<Flash> {
        match (self.flash_kind, self.flash_message) {
            (Some(kind), Some(message)) => {
                FlashKind::from_str(&kind).map(|kind| Flash { kind, message })
            }
            _ => None,
        }
    }
}
