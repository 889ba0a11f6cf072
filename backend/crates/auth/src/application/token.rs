//! Session Token Codec
//!
//! The cookie value is `<session uuid>.<base64url HMAC-SHA256>`. Every
//! consumer (login, logout, session resume) goes through this one codec
//! so there is a single authoritative notion of a valid token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::value_object::session_id::SessionId;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Generate a signed session token
pub fn generate(session_id: SessionId, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();

    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature))
}

/// Parse and verify a session token
///
/// Any malformed, forged, or tampered token fails with
/// `AuthError::SessionInvalid`; callers treat that like an absent
/// cookie.
pub fn parse(token: &str, secret: &[u8; 32]) -> AuthResult<SessionId> {
    let (session_id_str, signature_b64) = token
        .split_once('.')
        .ok_or(AuthError::SessionInvalid)?;

    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    let uuid: uuid::Uuid = session_id_str
        .parse()
        .map_err(|_| AuthError::SessionInvalid)?;

    Ok(SessionId::from_uuid(uuid))
}
