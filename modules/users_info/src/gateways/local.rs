use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::contract::{
    client::UsersInfoApi,
    error::UsersInfoError,
    model::{NewUser, SparseFieldSet, User, UserId},
    page::{Page, PageRequest},
};
use crate::domain::service::Service;

/// Local implementation of the UsersInfoApi trait that delegates to the domain service
pub struct UsersInfoLocalClient {
    service: Arc<Service>,
}

impl UsersInfoLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersInfoApi for UsersInfoLocalClient {
    async fn get_user(&self, id: UserId) -> Result<User, UsersInfoError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn list_users(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        page: PageRequest,
    ) -> Result<Page<User>, UsersInfoError> {
        self.service
            .list_users(from, to, page)
            .await
            .map_err(Into::into)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersInfoError> {
        self.service.create_user(new_user).await.map_err(Into::into)
    }

    async fn replace_user(&self, id: UserId, new_user: NewUser) -> Result<User, UsersInfoError> {
        self.service
            .replace_user(id, new_user)
            .await
            .map_err(Into::into)
    }

    async fn modify_user(
        &self,
        id: UserId,
        fields: SparseFieldSet,
    ) -> Result<User, UsersInfoError> {
        self.service
            .modify_user_fields(id, &fields)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UsersInfoError> {
        self.service.delete_user(id).await.map_err(Into::into)
    }
}
