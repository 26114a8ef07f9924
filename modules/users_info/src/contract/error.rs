use http::StatusCode;
use thiserror::Error;

use crate::contract::model::UserId;
use crate::domain::error::DomainError;

/// Coarse outcome class of a failed operation, mapped to a status code at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    BadInput,
    NotFound,
    Conflict,
    Internal,
}

impl StatusCategory {
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::BadInput => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersInfoError {
    #[error("{message}")]
    Validation { message: String },

    #[error("User with given id is not found: {id}")]
    NotFound { id: UserId },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Internal error")]
    Internal,
}

impl UsersInfoError {
    pub fn not_found(id: UserId) -> Self {
        Self::NotFound { id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }

    pub fn category(&self) -> StatusCategory {
        match self {
            Self::Validation { .. } => StatusCategory::BadInput,
            Self::NotFound { .. } => StatusCategory::NotFound,
            Self::Conflict { .. } => StatusCategory::Conflict,
            Self::Internal => StatusCategory::Internal,
        }
    }
}

impl From<DomainError> for UsersInfoError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UserNotFound { id } => Self::not_found(id),
            DomainError::Conflict { .. } => Self::conflict(err.to_string()),
            DomainError::Database { .. } => Self::internal(),
            DomainError::Validation { .. }
            | DomainError::UnknownField { .. }
            | DomainError::MinAge { .. }
            | DomainError::InvalidRange { .. } => Self::validation(err.to_string()),
        }
    }
}
