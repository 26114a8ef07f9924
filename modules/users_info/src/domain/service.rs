use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::contract::{NewUser, Page, PageRequest, SparseFieldSet, User, UserId, UserPatch};
use crate::domain::age::AgePolicy;
use crate::domain::error::DomainError;
use crate::domain::merge;
use crate::domain::ports::Clock;
use crate::domain::range::BirthDateRange;
use crate::domain::repo::UsersRepository;
use crate::domain::validation;

/// Domain service with business rules for user management.
/// Depends only on the repository and clock ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub min_age: u32,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_age: 18,
            default_page_size: 3,
            max_page_size: 1000,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn age_policy(&self) -> AgePolicy {
        AgePolicy::new(self.config.min_age)
    }

    /// Date the date-relative rules are evaluated against.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    #[instrument(name = "users_info.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: UserId) -> Result<User, DomainError> {
        debug!("Getting user by id");
        let user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(DomainError::from_storage)?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        debug!("Successfully retrieved user");
        Ok(user)
    }

    /// Users born within `[from, to]`, ordered and windowed by `page`.
    #[instrument(
        name = "users_info.service.list_users",
        skip(self, page),
        fields(from = %from, to = %to, offset = page.offset)
    )]
    pub async fn list_users(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        page: PageRequest,
    ) -> Result<Page<User>, DomainError> {
        debug!("Listing users by birth date range");
        let range = BirthDateRange::new(from, to)?;
        let page = self.resolve_page(page)?;

        let users = self
            .repo
            .list_by_birth_date(&range, &page)
            .await
            .map_err(DomainError::from_storage)?;

        debug!(
            "Successfully listed {} of {} users",
            users.items.len(),
            users.page_info.total_elements
        );
        Ok(users)
    }

    #[instrument(name = "users_info.service.create_user", skip(self, new_user))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");
        let today = self.today();

        validation::validate_new_user(&new_user, today)?;
        self.age_policy().check(new_user.birth_date, today)?;

        let user = self
            .repo
            .insert(new_user)
            .await
            .map_err(DomainError::from_storage)?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    /// Replace every attribute of user `id`.
    #[instrument(
        name = "users_info.service.replace_user",
        skip(self, new_user),
        fields(user_id = id)
    )]
    pub async fn replace_user(&self, id: UserId, new_user: NewUser) -> Result<User, DomainError> {
        info!("Replacing user");
        let today = self.today();

        validation::validate_new_user(&new_user, today)?;
        let exists = self
            .repo
            .exists_by_id(id)
            .await
            .map_err(DomainError::from_storage)?;
        if !exists {
            return Err(DomainError::user_not_found(id));
        }
        self.age_policy().check(new_user.birth_date, today)?;

        let user = new_user.with_id(id);
        self.repo
            .update(user.clone())
            .await
            .map_err(DomainError::from_storage)?;

        info!("Successfully replaced user");
        Ok(user)
    }

    /// Apply a typed patch to user `id`.
    #[instrument(
        name = "users_info.service.modify_user",
        skip(self, patch),
        fields(user_id = id)
    )]
    pub async fn modify_user(&self, id: UserId, patch: UserPatch) -> Result<User, DomainError> {
        info!("Modifying user");
        let today = self.today();

        validation::validate_patch(&patch, today)?;
        self.age_policy().check_patch(&patch, today)?;

        let current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(DomainError::from_storage)?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        if patch.is_empty() {
            debug!("Empty patch, nothing to store");
            return Ok(current);
        }

        let updated = merge::apply_patch(&current, &patch);
        self.repo
            .update(updated.clone())
            .await
            .map_err(DomainError::from_storage)?;

        info!("Successfully modified user");
        Ok(updated)
    }

    /// Apply a sparse `field name -> raw value` payload to user `id`.
    ///
    /// Unknown keys are rejected before any value is looked at.
    #[instrument(
        name = "users_info.service.modify_user_fields",
        skip(self, fields),
        fields(user_id = id, field_count = fields.len())
    )]
    pub async fn modify_user_fields(
        &self,
        id: UserId,
        fields: &SparseFieldSet,
    ) -> Result<User, DomainError> {
        validation::validate_sparse(fields, self.today())?;
        let patch = merge::parse_patch(fields)?;
        self.modify_user(id, patch).await
    }

    #[instrument(name = "users_info.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        info!("Deleting user");

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(DomainError::from_storage)?;

        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    fn resolve_page(&self, page: PageRequest) -> Result<PageRequest, DomainError> {
        let limit = page.limit.unwrap_or(self.config.default_page_size);
        if limit == 0 {
            return Err(DomainError::invalid_field(
                "limit",
                "must be greater than 0",
            ));
        }
        Ok(PageRequest {
            limit: Some(limit.min(self.config.max_page_size)),
            ..page
        })
    }
}
