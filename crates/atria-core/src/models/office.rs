//! Office domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organizational unit every user belongs to. Exactly one per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Office {
    pub id: Uuid,
    pub name: String,
}

impl Office {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
