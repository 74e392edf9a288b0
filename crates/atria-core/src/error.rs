//! Error types for the Atria platform.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtriaError {
    /// An action was denied by a permission or policy check. The message
    /// names the denied function or resource and is suitable for
    /// translation into a user-facing access-denied response.
    #[error("Authorization denied: {message}")]
    Unauthorized { message: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AtriaError {
    /// Shorthand for the authorization-denied kind.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AtriaError::Unauthorized {
            message: message.into(),
        }
    }
}

pub type AtriaResult<T> = Result<T, AtriaError>;
