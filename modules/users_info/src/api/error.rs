use std::error::Error as StdError;

use serde::{Deserialize, Serialize};

use crate::contract::{StatusCategory, UsersInfoError};
use crate::domain::error::DomainError;

/// Error body returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub reason_phrase: String,
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(category: StatusCategory, error: impl Into<String>, details: impl Into<String>) -> Self {
        let status = category.status_code();
        Self {
            status_code: status.as_u16(),
            reason_phrase: status.canonical_reason().unwrap_or_default().to_string(),
            error: error.into(),
            details: details.into(),
        }
    }

    /// Map a domain error. Storage internals are logged, not exposed.
    pub fn from_domain(e: &DomainError) -> Self {
        match e {
            DomainError::Database { .. } => {
                tracing::error!(error = ?e, "Database error occurred");
                Self::new(
                    StatusCategory::Internal,
                    "Internal error",
                    "An internal database error occurred",
                )
            }
            _ => Self::new(e.category(), e.to_string(), e.to_string()),
        }
    }

    pub fn from_error(e: &UsersInfoError) -> Self {
        Self::new(e.category(), e.to_string(), e.to_string())
    }

    /// Map any error, falling back to `Internal` for unrecognised kinds.
    pub fn from_any(e: &(dyn StdError + 'static)) -> Self {
        if let Some(domain) = e.downcast_ref::<DomainError>() {
            return Self::from_domain(domain);
        }
        if let Some(public) = e.downcast_ref::<UsersInfoError>() {
            return Self::from_error(public);
        }
        let category = classify(e);
        if category == StatusCategory::Internal {
            tracing::error!(error = %e, "Unclassified error");
        }
        Self::new(category, e.to_string(), render_chain(e))
    }
}

/// Status category of an arbitrary error.
pub fn classify(e: &(dyn StdError + 'static)) -> StatusCategory {
    if let Some(domain) = e.downcast_ref::<DomainError>() {
        domain.category()
    } else if let Some(public) = e.downcast_ref::<UsersInfoError>() {
        public.category()
    } else if e.is::<serde_json::Error>() {
        StatusCategory::BadInput
    } else {
        StatusCategory::Internal
    }
}

fn render_chain(e: &(dyn StdError + 'static)) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
