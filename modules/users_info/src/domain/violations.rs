//! Field-level violations and their aggregation into one message.
//!
//! Rules may run in any order; the rendered message depends only on the set
//! of distinct violations.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::error::DomainError;

const REASON_DELIMITER: &str = ": ";
const MULTIPLE_ERRORS_DELIMITER: &str = ", ";

/// One failed check on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.field)
        } else {
            write!(f, "{}{}{}", self.field, REASON_DELIMITER, self.message)
        }
    }
}

/// Render violations as `field: message` strings, drop duplicates, sort, and join.
pub fn aggregate<'a, I>(violations: I) -> String
where
    I: IntoIterator<Item = &'a Violation>,
{
    violations
        .into_iter()
        .map(ToString::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(MULTIPLE_ERRORS_DELIMITER)
}

/// Violations accumulated during a single validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(Violation::new(field, message));
    }

    /// Record a violation unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: impl Into<String>, message: impl Into<String>) {
        if !ok {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Aggregated, order-independent message.
    pub fn message(&self) -> String {
        aggregate(&self.0)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
