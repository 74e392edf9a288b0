//! Staff domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff member a user account may be linked to. At most one per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub display_name: String,
}

impl Staff {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
