//! Role domain model.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::permission::Permission;

/// A named bundle of permission codes assignable to users.
///
/// Roles compare and hash by `id` so they can live in sets on the user
/// aggregate; name and permission edits do not change identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub disabled: bool,
    pub permissions: BTreeSet<String>,
}

impl Role {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            disabled: false,
            permissions: BTreeSet::new(),
        }
    }

    /// Builder-style grant of a single permission code.
    pub fn grant(mut self, code: impl Into<String>) -> Self {
        self.permissions.insert(code.into());
        self
    }

    /// Grant a permission from the catalog.
    pub fn grant_permission(self, permission: &Permission) -> Self {
        self.grant(permission.code.clone())
    }

    /// Whether this role explicitly grants `code`.
    pub fn has_permission_to(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }

    pub fn permission_codes(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(String::as_str)
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn grants_are_explicit() {
        let role = Role::new("teller", "branch teller").grant("READ_CLIENT");
        assert!(role.has_permission_to("READ_CLIENT"));
        assert!(!role.has_permission_to("CREATE_CLIENT"));
    }

    #[test]
    fn catalog_grants_use_the_permission_code() {
        let read_client = Permission::new("READ_CLIENT", "portfolio");
        let role = Role::new("viewer", "").grant_permission(&read_client);
        assert!(role.has_permission_to("READ_CLIENT"));
    }

    #[test]
    fn identity_is_by_id() {
        let a = Role::new("teller", "a");
        let mut b = a.clone();
        b.name = "renamed".into();
        b.permissions.insert("READ_CLIENT".into());

        let mut set = HashSet::new();
        set.insert(a);
        // Same id — replaces rather than duplicates.
        set.insert(b);
        assert_eq!(set.len(), 1);
    }
}
