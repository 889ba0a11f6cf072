//! API DTOs (Data Transfer Objects)
//!
//! Form payloads and page contexts. Page contexts are what a template
//! layer would render; serving them as JSON keeps the route semantics
//! testable without one.

use serde::{Deserialize, Serialize};

use crate::domain::entity::session::Flash;

// ============================================================================
// Flash
// ============================================================================

/// A one-shot message for the next page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashDto {
    pub kind: String,
    pub message: String,
}

impl From<Flash> for FlashDto {
    fn from(flash: Flash) -> Self {
        Self {
            kind: flash.kind.as_str().to_string(),
            message: flash.message,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login form payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page context
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    pub app_name: &'static str,
    pub flash: Option<FlashDto>,
}

// ============================================================================
// Registration
// ============================================================================

/// Registration form payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
}

/// Registration page context
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPage {
    pub app_name: &'static str,
    pub flash: Option<FlashDto>,
}
