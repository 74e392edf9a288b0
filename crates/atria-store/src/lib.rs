//! Atria Store — in-memory implementation of the core repository
//! traits.
//!
//! The store is the owning side of two invariants the aggregate cannot
//! enforce itself: usernames are unique among non-deleted users, and
//! soft-deleted users never surface through lookups or listings.

use std::collections::HashMap;
use std::sync::Arc;

use atria_core::error::{AtriaError, AtriaResult};
use atria_core::models::user::AppUser;
use atria_core::repository::{PaginatedResult, Pagination, UserRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory user repository, cloneable and shareable across tasks.
///
/// Concurrent updates to the same aggregate are serialized by the inner
/// write lock; the domain layer performs no compare-and-swap of its own.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, AppUser>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUserRepository {
    async fn save(&self, user: AppUser) -> AtriaResult<AppUser> {
        let mut users = self.users.write().await;

        if !user.is_deleted() {
            let conflict = users.values().any(|existing| {
                existing.id() != user.id()
                    && !existing.is_deleted()
                    && existing.username() == user.username()
            });
            if conflict {
                return Err(AtriaError::AlreadyExists {
                    entity: format!("user with username {}", user.username()),
                });
            }
        }

        users.insert(user.id(), user.clone());
        tracing::debug!(user_id = %user.id(), "saved user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> AtriaResult<AppUser> {
        let users = self.users.read().await;
        users
            .get(&id)
            .filter(|user| !user.is_deleted())
            .cloned()
            .ok_or_else(|| AtriaError::NotFound {
                entity: "user".into(),
                id: id.to_string(),
            })
    }

    async fn get_by_username(&self, username: &str) -> AtriaResult<AppUser> {
        let users = self.users.read().await;
        users
            .values()
            .find(|user| !user.is_deleted() && user.username() == username)
            .cloned()
            .ok_or_else(|| AtriaError::NotFound {
                entity: "user".into(),
                id: format!("username={username}"),
            })
    }

    async fn list(&self, pagination: Pagination) -> AtriaResult<PaginatedResult<AppUser>> {
        let users = self.users.read().await;

        let mut items: Vec<AppUser> = users
            .values()
            .filter(|user| !user.is_deleted())
            .cloned()
            .collect();
        items.sort_by(|a, b| a.username().cmp(b.username()));

        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect();

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
