//! Domain models for Atria.
//!
//! These are the core types shared across all crates.

pub mod book;
pub mod client;
pub mod office;
pub mod permission;
pub mod role;
pub mod staff;
pub mod user;
