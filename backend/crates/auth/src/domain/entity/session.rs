//! Session Entity
//!
//! Server-side session state keyed by a signed cookie token. One row
//! per browser session; the row is created on first contact and moves
//! between exactly two authentication states:
//!
//! Anonymous (`user_id == None`) → Authenticated (`Some`) → Anonymous.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{session_id::SessionId, user_id::UserId};

/// One-shot message kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashKind::Success),
            "error" => Some(FlashKind::Error),
            _ => None,
        }
    }
}

/// One-shot flash message, shown on the next rendered page only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4); the cookie carries this plus an HMAC
    pub session_id: SessionId,
    /// Authenticated user, if any
    pub user_id: Option<UserId>,
    /// Pending one-shot message
    pub flash: Option<Flash>,
    /// Last-seen Referer URL
    pub back_url: Option<String>,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Create a new anonymous session
    ///
    /// TTL is provided by the application layer (config), not hard-coded
    /// here.
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: SessionId::new(),
            user_id: None,
            flash: None,
            back_url: None,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Whether an authenticated user is attached
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Attach an authenticated identity (login)
    pub fn attach_user(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
        self.touch();
    }

    /// Detach the authenticated identity (logout)
    ///
    /// Idempotent: clearing an already-anonymous session is a no-op.
    pub fn clear_user(&mut self) {
        self.user_id = None;
        self.touch();
    }

    /// Queue a one-shot message for the next rendered page
    pub fn set_flash(&mut self, flash: Flash) {
        self.flash = Some(flash);
        self.touch();
    }

    /// Consume the pending flash, if any
    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }

    /// Record the Referer of the current request
    pub fn record_referrer(&mut self, referrer: Option<&str>) {
        self.back_url = Some(referrer.unwrap_or("/").to_string());
    }
}
