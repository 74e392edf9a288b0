//! Client domain model and the user-to-client mapping entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer record a self-service user may be allowed to operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub display_name: String,
}

impl Client {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
        }
    }
}

/// Allow-list entry owned by the user aggregate: one per client a
/// self-service user may access. Identity is the client id, so mappings
/// form a set and re-adding an existing client is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientMapping {
    pub client_id: Uuid,
}

impl ClientMapping {
    pub fn new(client: &Client) -> Self {
        Self {
            client_id: client.id,
        }
    }
}
