//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The store serializes concurrent
//! updates to the same aggregate identity; the domain layer performs no
//! compare-and-swap of its own.

use uuid::Uuid;

use crate::error::AtriaResult;
use crate::models::user::AppUser;

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Owning store for user aggregates.
///
/// `save` upserts by aggregate id and owns the username-uniqueness
/// invariant among non-deleted users (`AlreadyExists` on conflict).
/// Lookups and listings never surface soft-deleted users — deletion
/// rewrites the username precisely so the store can free it for reuse.
pub trait UserRepository: Send + Sync {
    fn save(&self, user: AppUser) -> impl Future<Output = AtriaResult<AppUser>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AtriaResult<AppUser>> + Send;
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = AtriaResult<AppUser>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AtriaResult<PaginatedResult<AppUser>>> + Send;
}
