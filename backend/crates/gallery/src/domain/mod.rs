//! Domain Layer

pub mod photo;
pub mod store;
