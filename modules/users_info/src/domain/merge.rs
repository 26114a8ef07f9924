//! Partial-update merge: a field present in the patch replaces the stored
//! value, an absent field keeps it.

use crate::contract::{SparseFieldSet, User, UserField, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::validation::{parse_date, BIRTH_DATE_MESSAGE};

/// Convert a sparse payload into a typed patch.
///
/// Fails with `UnknownField` when a key names no mutable attribute, and with a
/// `birthDate` validation error when the date does not parse. Other values are
/// taken verbatim; run `validation::validate_sparse` for the full rule set.
pub fn parse_patch(fields: &SparseFieldSet) -> Result<UserPatch, DomainError> {
    let unknown = fields.unknown_keys();
    if !unknown.is_empty() {
        return Err(DomainError::unknown_field(unknown));
    }

    let birth_date = match fields.get(UserField::BirthDate) {
        Some(raw) => Some(parse_date(raw).ok_or_else(|| {
            DomainError::invalid_field(UserField::BirthDate.as_str(), BIRTH_DATE_MESSAGE)
        })?),
        None => None,
    };
    let text = |field: UserField| fields.get(field).map(str::to_owned);

    Ok(UserPatch {
        email: text(UserField::Email),
        first_name: text(UserField::FirstName),
        last_name: text(UserField::LastName),
        birth_date,
        address: text(UserField::Address),
        phone_number: text(UserField::PhoneNumber),
    })
}

/// Produce the merged record. The id never changes.
pub fn apply_patch(existing: &User, patch: &UserPatch) -> User {
    let pick = |new: &Option<String>, old: &String| new.clone().unwrap_or_else(|| old.clone());
    User {
        id: existing.id,
        email: pick(&patch.email, &existing.email),
        first_name: pick(&patch.first_name, &existing.first_name),
        last_name: pick(&patch.last_name, &existing.last_name),
        birth_date: patch.birth_date.unwrap_or(existing.birth_date),
        address: patch.address.clone().or_else(|| existing.address.clone()),
        phone_number: patch
            .phone_number
            .clone()
            .or_else(|| existing.phone_number.clone()),
    }
}

/// Merge a sparse payload into `existing`.
pub fn merge(existing: &User, updates: &SparseFieldSet) -> Result<User, DomainError> {
    let patch = parse_patch(updates)?;
    Ok(apply_patch(existing, &patch))
}
