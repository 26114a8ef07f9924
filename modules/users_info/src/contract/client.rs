use async_trait::async_trait;
use chrono::NaiveDate;

use crate::contract::{
    error::UsersInfoError,
    model::{NewUser, SparseFieldSet, User, UserId},
    page::{Page, PageRequest},
};

/// Public API trait for the users_info module that other modules can use
#[async_trait]
pub trait UsersInfoApi: Send + Sync {
    /// Get a user by ID
    async fn get_user(&self, id: UserId) -> Result<User, UsersInfoError>;

    /// Users born within `[from, to]`, one page at a time
    async fn list_users(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        page: PageRequest,
    ) -> Result<Page<User>, UsersInfoError>;

    /// Create a new user
    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersInfoError>;

    /// Replace every attribute of an existing user
    async fn replace_user(&self, id: UserId, new_user: NewUser) -> Result<User, UsersInfoError>;

    /// Update only the attributes present in `fields`
    async fn modify_user(&self, id: UserId, fields: SparseFieldSet)
        -> Result<User, UsersInfoError>;

    /// Delete a user by ID
    async fn delete_user(&self, id: UserId) -> Result<(), UsersInfoError>;
}
