//! Age eligibility: whole calendar years between a birth date and today.

use chrono::NaiveDate;

use crate::contract::UserPatch;
use crate::domain::error::DomainError;

/// Whole years elapsed since `birth_date`. `None` when `birth_date` is after `today`.
///
/// A Feb 29 birthday completes a year on Mar 1 in non-leap years.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(birth_date)
}

pub fn is_eligible(birth_date: NaiveDate, min_years: u32, today: NaiveDate) -> bool {
    age_in_years(birth_date, today).is_some_and(|age| age >= min_years)
}

/// Minimum-age rule applied to creates, replaces and birth-date modifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgePolicy {
    min_age: u32,
}

impl AgePolicy {
    pub fn new(min_age: u32) -> Self {
        Self { min_age }
    }

    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    pub fn check(&self, birth_date: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
        if is_eligible(birth_date, self.min_age, today) {
            Ok(())
        } else {
            Err(DomainError::min_age(self.min_age))
        }
    }

    /// Patches that leave the birth date alone are not re-checked, even if the
    /// stored user would now fail a raised minimum.
    pub fn check_patch(&self, patch: &UserPatch, today: NaiveDate) -> Result<(), DomainError> {
        match patch.birth_date {
            Some(birth_date) => self.check(birth_date, today),
            None => Ok(()),
        }
    }
}
