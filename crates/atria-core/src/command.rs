//! Validated command payloads.
//!
//! [`JsonCommand`] wraps an already-validated JSON request body and
//! exposes the typed parameter accessors the domain layer consumes.
//! Upstream request validation (schema, allowed parameters) is a
//! collaborator concern and happens before a command reaches this type.

use serde_json::Value;
use uuid::Uuid;

use crate::error::{AtriaError, AtriaResult};
use crate::password::PlatformPasswordEncoder;

#[derive(Debug, Clone)]
pub struct JsonCommand {
    json: Value,
}

impl JsonCommand {
    pub fn from_value(json: Value) -> Self {
        Self { json }
    }

    pub fn parse(body: &str) -> AtriaResult<Self> {
        let json = serde_json::from_str(body).map_err(|e| AtriaError::Validation {
            message: format!("invalid command body: {e}"),
        })?;
        Ok(Self { json })
    }

    pub fn parameter_exists(&self, name: &str) -> bool {
        self.json.get(name).is_some()
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter_exists(name)
    }

    /// Trimmed string value of a parameter; missing or non-string
    /// parameters read as empty.
    pub fn string_value_of(&self, name: &str) -> String {
        self.json
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    /// Boolean value of a parameter; missing parameters read as false.
    pub fn boolean_primitive_value_of(&self, name: &str) -> bool {
        self.json
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Boolean value of a parameter, distinguishing absent from false.
    pub fn boolean_object_value_of(&self, name: &str) -> Option<bool> {
        self.json.get(name).and_then(Value::as_bool)
    }

    pub fn is_change_in_string_parameter(&self, name: &str, existing: &str) -> bool {
        self.string_value_of(name) != existing
    }

    /// Encode the raw password carried by `name` with the caller's
    /// encoder and identity.
    pub fn password_value_of<E>(
        &self,
        name: &str,
        encoder: &E,
        user_id: Uuid,
    ) -> AtriaResult<String>
    where
        E: PlatformPasswordEncoder + ?Sized,
    {
        encoder.encode(&self.string_value_of(name), user_id)
    }

    /// Whether the raw password carried by `name` encodes to something
    /// other than `existing_encoded`. The encoder must be deterministic
    /// per `(raw, user_id)` for this comparison to be meaningful.
    pub fn is_change_in_password_parameter<E>(
        &self,
        name: &str,
        existing_encoded: &str,
        encoder: &E,
        user_id: Uuid,
    ) -> AtriaResult<bool>
    where
        E: PlatformPasswordEncoder + ?Sized,
    {
        Ok(self.password_value_of(name, encoder, user_id)? != existing_encoded)
    }
}
