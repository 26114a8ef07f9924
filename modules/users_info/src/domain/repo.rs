use async_trait::async_trait;
use thiserror::Error;

use crate::contract::{NewUser, Page, PageRequest, User, UserId};
use crate::domain::range::BirthDateRange;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Conflicting writes to the same id are serialised by the adapter; the
/// service neither locks nor retries.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>>;
    async fn exists_by_id(&self, id: UserId) -> anyhow::Result<bool>;
    /// Persist a new user; the repository assigns the id.
    async fn insert(&self, new_user: NewUser) -> anyhow::Result<User>;
    /// Overwrite an existing user (by primary key in `user.id`).
    async fn update(&self, user: User) -> anyhow::Result<()>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: UserId) -> anyhow::Result<bool>;
    /// Users whose birth date lies in `range` (both ends inclusive).
    /// `page.limit` is always resolved by the caller.
    async fn list_by_birth_date(
        &self,
        range: &BirthDateRange,
        page: &PageRequest,
    ) -> anyhow::Result<Page<User>>;
}

/// Returned by adapters when a write collides with another one.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StorageConflict {
    message: String,
}

impl StorageConflict {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
