//! Application Layer - Use Cases

pub mod config;
pub mod login;
pub mod logout;
pub mod register;
pub mod resume_session;
pub mod token;

pub use login::{LoginInput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use resume_session::{ResumeSessionUseCase, ResumedSession};
