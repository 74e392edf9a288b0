//! Atria Core — domain models, repository traits, and shared error
//! types for the Atria back-office administration platform.
//!
//! The central type is the [`models::user::AppUser`] aggregate: a
//! back-office user record owning its roles and self-service client
//! allow-list, with guarded mutations and permission evaluation.

pub mod command;
pub mod dates;
pub mod error;
pub mod models;
pub mod password;
pub mod repository;

pub use command::JsonCommand;
pub use error::{AtriaError, AtriaResult};
