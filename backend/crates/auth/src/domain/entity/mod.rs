//! Domain Entities

pub mod session;
pub mod user;

pub use session::{Flash, FlashKind, Session};
pub use user::User;
