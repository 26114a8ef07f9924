use chrono::NaiveDate;
use thiserror::Error;

use crate::contract::{StatusCategory, UserId};
use crate::domain::repo::StorageConflict;
use crate::domain::violations::Violations;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{violations}")]
    Validation { violations: Violations },

    #[error("Invalid field: {}", fields.join(", "))]
    UnknownField { fields: Vec<String> },

    #[error("User must be older than {min_age}")]
    MinAge { min_age: u32 },

    #[error("from date must be less than to date")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("User with given id is not found: {id}")]
    UserNotFound { id: UserId },

    #[error("Conflicting write: {message}")]
    Conflict { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn validation(violations: Violations) -> Self {
        Self::Validation { violations }
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut violations = Violations::new();
        violations.push(field, message);
        Self::Validation { violations }
    }

    pub fn unknown_field(fields: Vec<String>) -> Self {
        Self::UnknownField { fields }
    }

    pub fn min_age(min_age: u32) -> Self {
        Self::MinAge { min_age }
    }

    pub fn invalid_range(from: NaiveDate, to: NaiveDate) -> Self {
        Self::InvalidRange { from, to }
    }

    pub fn user_not_found(id: UserId) -> Self {
        Self::UserNotFound { id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Classify a storage failure. Only [`StorageConflict`] is recognised;
    /// everything else is an internal database error.
    pub fn from_storage(err: anyhow::Error) -> Self {
        match err.downcast_ref::<StorageConflict>() {
            Some(conflict) => Self::conflict(conflict.to_string()),
            None => Self::database(format!("{err:#}")),
        }
    }

    pub fn category(&self) -> StatusCategory {
        match self {
            Self::Validation { .. }
            | Self::UnknownField { .. }
            | Self::MinAge { .. }
            | Self::InvalidRange { .. } => StatusCategory::BadInput,
            Self::UserNotFound { .. } => StatusCategory::NotFound,
            Self::Conflict { .. } => StatusCategory::Conflict,
            Self::Database { .. } => StatusCategory::Internal,
        }
    }
}
