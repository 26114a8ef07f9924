//! Field rules shared by typed requests (create/replace), typed patches and
//! sparse modify payloads.
//!
//! Every rule is a single predicate. The typed path applies all of them; the
//! patch and sparse paths apply a rule only when its field is present.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::contract::{NewUser, SparseFieldSet, UserField, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::violations::Violations;

pub const EMAIL_MESSAGE: &str = "must be a not blank well-formed email address";
pub const NOT_BLANK_MESSAGE: &str = "must not be blank";
pub const NOT_BLANK_NULLABLE_MESSAGE: &str = "must contain at least one non-whitespace character";
pub const BIRTH_DATE_MESSAGE: &str = "must be a valid local date earlier than current day";

pub const NAME_MAX_LEN: usize = 128;
pub const ADDRESS_MAX_LEN: usize = 255;
pub const PHONE_NUMBER_MAX_LEN: usize = 15;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_!#$%&’*+=?`{|}~^.-]+@[a-zA-Z0-9.-]+$")
        .expect("email pattern must compile")
});

// --- predicates ---

/// Present and shaped like `local@domain`. No deliverability check.
pub fn is_valid_email(value: Option<&str>) -> bool {
    value.is_some_and(|v| EMAIL_RE.is_match(v))
}

/// Required-field check: present with at least one non-whitespace character.
pub fn is_non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Optional-field check: absent, or present with at least one non-whitespace character.
pub fn is_non_blank_or_absent(value: Option<&str>) -> bool {
    value.is_none_or(|v| !v.trim().is_empty())
}

/// Between 1 and `max` characters. Absent values pass.
pub fn is_within_length(value: Option<&str>, max: usize) -> bool {
    value.is_none_or(|v| (1..=max).contains(&v.chars().count()))
}

/// Present and strictly before `today`.
pub fn is_past_date(value: Option<NaiveDate>, today: NaiveDate) -> bool {
    value.is_some_and(|d| d < today)
}

/// Raw-text form of [`is_past_date`]: the value must also parse as a date.
pub fn is_past_date_str(value: Option<&str>, today: NaiveDate) -> bool {
    is_past_date(value.and_then(parse_date), today)
}

/// Parse an ISO-8601 calendar date. Only the exact `YYYY-MM-DD` shape is accepted.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn size_message(max: usize) -> String {
    format!("size must be between 1 and {max}")
}

// --- per-field checks ---

fn max_len(field: UserField) -> Option<usize> {
    match field {
        UserField::FirstName | UserField::LastName => Some(NAME_MAX_LEN),
        UserField::Address => Some(ADDRESS_MAX_LEN),
        UserField::PhoneNumber => Some(PHONE_NUMBER_MAX_LEN),
        UserField::Email | UserField::BirthDate => None,
    }
}

/// Check one field given as text. `value` is `None` only for an absent
/// optional field or a missing required one.
fn check_text(
    violations: &mut Violations,
    field: UserField,
    value: Option<&str>,
    today: NaiveDate,
) {
    let name = field.as_str();
    match field {
        UserField::Email => violations.check(is_valid_email(value), name, EMAIL_MESSAGE),
        UserField::FirstName | UserField::LastName => {
            violations.check(is_non_blank(value), name, NOT_BLANK_MESSAGE)
        }
        UserField::Address | UserField::PhoneNumber => violations.check(
            is_non_blank_or_absent(value),
            name,
            NOT_BLANK_NULLABLE_MESSAGE,
        ),
        UserField::BirthDate => {
            violations.check(is_past_date_str(value, today), name, BIRTH_DATE_MESSAGE)
        }
    }
    if let Some(max) = max_len(field) {
        violations.check(is_within_length(value, max), name, size_message(max));
    }
}

fn check_birth_date(violations: &mut Violations, value: Option<NaiveDate>, today: NaiveDate) {
    violations.check(
        is_past_date(value, today),
        UserField::BirthDate.as_str(),
        BIRTH_DATE_MESSAGE,
    );
}

// --- request shapes ---

/// Run every field rule over raw attribute text, as received before conversion.
/// A `None` value stands for an attribute that was not supplied.
pub fn check_raw_fields(fields: &[(UserField, Option<&str>)], today: NaiveDate) -> Violations {
    let mut violations = Violations::new();
    for &(field, value) in fields {
        check_text(&mut violations, field, value, today);
    }
    violations
}

/// Validate a create or replace request. Every field is checked.
pub fn validate_new_user(user: &NewUser, today: NaiveDate) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    check_text(&mut violations, UserField::Email, Some(user.email.as_str()), today);
    check_text(
        &mut violations,
        UserField::FirstName,
        Some(user.first_name.as_str()),
        today,
    );
    check_text(
        &mut violations,
        UserField::LastName,
        Some(user.last_name.as_str()),
        today,
    );
    check_birth_date(&mut violations, Some(user.birth_date), today);
    check_text(
        &mut violations,
        UserField::Address,
        user.address.as_deref(),
        today,
    );
    check_text(
        &mut violations,
        UserField::PhoneNumber,
        user.phone_number.as_deref(),
        today,
    );
    violations.into_result()
}

/// Validate a typed patch. Only fields that are set are checked.
pub fn validate_patch(patch: &UserPatch, today: NaiveDate) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    let texts = [
        (UserField::Email, &patch.email),
        (UserField::FirstName, &patch.first_name),
        (UserField::LastName, &patch.last_name),
        (UserField::Address, &patch.address),
        (UserField::PhoneNumber, &patch.phone_number),
    ];
    for (field, value) in texts {
        if value.is_some() {
            check_text(&mut violations, field, value.as_deref(), today);
        }
    }
    if patch.birth_date.is_some() {
        check_birth_date(&mut violations, patch.birth_date, today);
    }
    violations.into_result()
}

/// Validate a sparse modify payload: unknown keys first, then every present field.
pub fn validate_sparse(fields: &SparseFieldSet, today: NaiveDate) -> Result<(), DomainError> {
    let unknown = fields.unknown_keys();
    if !unknown.is_empty() {
        return Err(DomainError::unknown_field(unknown));
    }

    let mut violations = Violations::new();
    for field in UserField::ALL {
        if let Some(value) = fields.get(field) {
            check_text(&mut violations, field, Some(value), today);
        }
    }
    violations.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn valid_user() -> NewUser {
        NewUser {
            email: "john.doe@example.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            address: None,
            phone_number: Some("+380501234567".into()),
        }
    }

    fn message(err: DomainError) -> String {
        match err {
            DomainError::Validation { violations } => violations.message(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email(Some("a@b.com")));
        assert!(is_valid_email(Some("first.last+tag@sub-domain.example")));
        assert!(is_valid_email(Some("o’neil@example.com")));
        assert!(!is_valid_email(Some("no-at-sign")));
        assert!(!is_valid_email(Some("two@@example.com")));
        assert!(!is_valid_email(Some("spaces in@example.com")));
        assert!(!is_valid_email(Some("")));
        assert!(!is_valid_email(None));
    }

    #[test]
    fn blank_checks_distinguish_required_and_optional() {
        assert!(is_non_blank(Some("x")));
        assert!(!is_non_blank(Some(" \t")));
        assert!(!is_non_blank(None));

        assert!(is_non_blank_or_absent(None));
        assert!(is_non_blank_or_absent(Some(" x ")));
        assert!(!is_non_blank_or_absent(Some("")));
        assert!(!is_non_blank_or_absent(Some("   ")));
    }

    #[test]
    fn past_date_is_strict() {
        let yesterday = today().pred_opt();
        assert!(is_past_date(yesterday, today()));
        assert!(!is_past_date(Some(today()), today()));
        assert!(!is_past_date(today().succ_opt(), today()));
        assert!(!is_past_date(None, today()));
    }

    #[test]
    fn past_date_from_text() {
        assert!(is_past_date_str(Some("2024-06-14"), today()));
        assert!(!is_past_date_str(Some("2024-06-15"), today()));
        assert!(!is_past_date_str(Some("14.06.2024"), today()));
        assert!(!is_past_date_str(None, today()));
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            parse_date("1996-02-29"),
            NaiveDate::from_ymd_opt(1996, 2, 29)
        );
        assert_eq!(parse_date("1997-02-29"), None);
        assert_eq!(parse_date("29.02.1996"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn date_parsing_rejects_loose_shapes() {
        for raw in [
            "2000-1-1",
            " 2000-01-01",
            "2000-01-01 ",
            "+2000-01-01",
            "2000 -01-01",
            "2000-01-01\n",
            "2000/01/01",
            "20000-01-01",
        ] {
            assert_eq!(parse_date(raw), None, "{raw:?}");
        }
        assert_eq!(parse_date("2000-01-01"), NaiveDate::from_ymd_opt(2000, 1, 1));
    }

    #[test]
    fn length_counts_characters() {
        assert!(is_within_length(Some("Олександр"), 9));
        assert!(!is_within_length(Some("Олександр"), 8));
        assert!(is_within_length(None, 0));
        assert!(!is_within_length(Some(""), 5));
    }

    #[test]
    fn valid_new_user_passes() {
        assert!(validate_new_user(&valid_user(), today()).is_ok());
    }

    #[test]
    fn new_user_violations_are_aggregated() {
        let user = NewUser {
            email: "broken".into(),
            first_name: " ".into(),
            birth_date: today(),
            address: Some("".into()),
            ..valid_user()
        };

        assert_eq!(
            message(validate_new_user(&user, today()).unwrap_err()),
            "address: must contain at least one non-whitespace character, \
             address: size must be between 1 and 255, \
             birthDate: must be a valid local date earlier than current day, \
             email: must be a not blank well-formed email address, \
             firstName: must not be blank"
        );
    }

    #[test]
    fn new_user_length_limits() {
        let user = NewUser {
            last_name: "x".repeat(NAME_MAX_LEN + 1),
            phone_number: Some("1".repeat(PHONE_NUMBER_MAX_LEN + 1)),
            ..valid_user()
        };

        assert_eq!(
            message(validate_new_user(&user, today()).unwrap_err()),
            "lastName: size must be between 1 and 128, phoneNumber: size must be between 1 and 15"
        );
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(validate_patch(&UserPatch::default(), today()).is_ok());
    }

    #[test]
    fn patch_checks_only_present_fields() {
        let patch = UserPatch {
            last_name: Some("".into()),
            birth_date: today().succ_opt(),
            ..UserPatch::default()
        };

        assert_eq!(
            message(validate_patch(&patch, today()).unwrap_err()),
            "birthDate: must be a valid local date earlier than current day, \
             lastName: must not be blank, \
             lastName: size must be between 1 and 128"
        );
    }

    #[test]
    fn sparse_rejects_unknown_keys_before_validating() {
        let fields: SparseFieldSet = [("email", "bad"), ("nickname", "x"), ("id", "3")]
            .into_iter()
            .collect();

        match validate_sparse(&fields, today()).unwrap_err() {
            DomainError::UnknownField { fields } => assert_eq!(fields, vec!["id", "nickname"]),
            other => panic!("expected unknown field, got {other:?}"),
        }
    }

    #[test]
    fn sparse_absent_keys_are_not_violations() {
        assert!(validate_sparse(&SparseFieldSet::new(), today()).is_ok());

        let fields: SparseFieldSet = [("address", "Kyiv")].into_iter().collect();
        assert!(validate_sparse(&fields, today()).is_ok());
    }

    #[test]
    fn sparse_present_values_are_checked() {
        let fields: SparseFieldSet = [
            ("birthDate", "not-a-date"),
            ("firstName", "  "),
            ("phoneNumber", ""),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            message(validate_sparse(&fields, today()).unwrap_err()),
            "birthDate: must be a valid local date earlier than current day, \
             firstName: must not be blank, \
             phoneNumber: must contain at least one non-whitespace character, \
             phoneNumber: size must be between 1 and 15"
        );
    }

    #[test]
    fn sparse_values_respect_length_limits() {
        let long_name = "x".repeat(NAME_MAX_LEN + 1);
        let fields: SparseFieldSet = [("lastName", long_name.as_str()), ("address", "Kyiv")]
            .into_iter()
            .collect();

        assert_eq!(
            message(validate_sparse(&fields, today()).unwrap_err()),
            "lastName: size must be between 1 and 128"
        );
    }

    #[test]
    fn sparse_birth_date_must_be_iso() {
        let fields: SparseFieldSet = [("birthDate", "1990-1-1")].into_iter().collect();

        assert_eq!(
            message(validate_sparse(&fields, today()).unwrap_err()),
            "birthDate: must be a valid local date earlier than current day"
        );
    }

    #[test]
    fn raw_fields_report_every_rule() {
        let violations = check_raw_fields(
            &[
                (UserField::Email, Some("broken")),
                (UserField::FirstName, Some("   ")),
                (UserField::LastName, None),
                (UserField::BirthDate, None),
                (UserField::Address, Some("")),
                (UserField::PhoneNumber, None),
            ],
            today(),
        );

        assert_eq!(
            violations.message(),
            "address: must contain at least one non-whitespace character, \
             address: size must be between 1 and 255, \
             birthDate: must be a valid local date earlier than current day, \
             email: must be a not blank well-formed email address, \
             firstName: must not be blank, \
             lastName: must not be blank"
        );
    }

    #[test]
    fn sparse_and_typed_paths_agree() {
        let fields: SparseFieldSet = [("email", "x@y"), ("lastName", "")].into_iter().collect();
        let patch = UserPatch {
            email: Some("x@y".into()),
            last_name: Some("".into()),
            ..UserPatch::default()
        };

        assert_eq!(
            message(validate_sparse(&fields, today()).unwrap_err()),
            message(validate_patch(&patch, today()).unwrap_err())
        );
    }
}
