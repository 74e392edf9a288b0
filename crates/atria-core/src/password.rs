//! Password generation and the encoding seam.

use rand::Rng;
use rand::distr::Alphanumeric;
use uuid::Uuid;

use crate::error::AtriaResult;

/// Length of generated passwords when credentials are delivered out of
/// band instead of being chosen by the requester.
pub const GENERATED_PASSWORD_LENGTH: usize = 13;

/// Generates random alphanumeric passwords from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomPasswordGenerator {
    length: usize,
}

impl RandomPasswordGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn generate(&self) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

impl Default for RandomPasswordGenerator {
    fn default() -> Self {
        Self::new(GENERATED_PASSWORD_LENGTH)
    }
}

/// Opaque password-encoding collaborator.
///
/// Implementations must be deterministic per `(raw_password, user_id)`:
/// the command layer detects password changes by re-encoding the
/// submitted value and comparing it with the stored one.
pub trait PlatformPasswordEncoder: Send + Sync {
    fn encode(&self, raw_password: &str, user_id: Uuid) -> AtriaResult<String>;
}
