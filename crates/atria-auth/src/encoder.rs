//! Argon2id implementation of the platform password encoder.
//!
//! Parameters follow the OWASP ASVS recommendation (memory: 19 MiB,
//! iterations: 2, parallelism: 1). The salt is derived from the user id,
//! which makes `encode` deterministic per `(raw, user_id)` — the command
//! layer detects password changes by re-encoding and comparing. An
//! optional pepper (server-side secret) can be provided at construction
//! time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use atria_core::error::{AtriaError, AtriaResult};
use atria_core::password::PlatformPasswordEncoder;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordEncoder {
    pepper: Option<String>,
}

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self { pepper: None }
    }

    pub fn with_pepper(pepper: String) -> Self {
        Self {
            pepper: Some(pepper),
        }
    }
}

impl PlatformPasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw_password: &str, user_id: Uuid) -> AtriaResult<String> {
        // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
        let params = argon2::Params::new(19456, 2, 1, None)
            .map_err(|e| AtriaError::Internal(format!("argon2 params error: {e}")))?;
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

        let peppered: String;
        let input = match self.pepper.as_deref() {
            Some(p) => {
                peppered = format!("{p}{raw_password}");
                peppered.as_bytes()
            }
            None => raw_password.as_bytes(),
        };

        let salt = SaltString::encode_b64(user_id.as_bytes())
            .map_err(|e| AtriaError::Internal(format!("salt encode error: {e}")))?;

        let hash = argon2
            .hash_password(input, &salt)
            .map_err(|e| AtriaError::Internal(format!("password hash error: {e}")))?;

        Ok(hash.to_string())
    }
}
