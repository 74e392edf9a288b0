//! Atria Auth — Argon2id password encoding and the user
//! administration service.

pub mod encoder;
pub mod service;

pub use encoder::Argon2PasswordEncoder;
pub use service::UserService;
