//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    CurrentSession, CurrentUser, SessionLayerState, require_anonymous, require_authenticated,
    session_layer,
};
pub use router::{auth_router, auth_router_generic};
