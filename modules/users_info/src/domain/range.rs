use chrono::NaiveDate;

use crate::domain::error::DomainError;

/// Reject ranges whose `to` is strictly before `from`.
pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), DomainError> {
    if to < from {
        return Err(DomainError::invalid_range(from, to));
    }
    Ok(())
}

/// Inclusive birth-date range, ordered by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl BirthDateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DomainError> {
        validate_range(from, to)?;
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}
