use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

/// Storage-assigned numeric identifier.
pub type UserId = i64;

/// Pure user model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Full set of user attributes, used for create and for wholesale replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl NewUser {
    /// Attach an identifier, producing the record that replaces user `id`.
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            address: self.address,
            phone_number: self.phone_number,
        }
    }
}

/// Partial update data for a user.
///
/// `Some` replaces the field, `None` keeps the stored value. Optional
/// attributes cannot be cleared through a patch; use a replace instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// The mergeable user attributes, spelled as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    Email,
    FirstName,
    LastName,
    BirthDate,
    Address,
    PhoneNumber,
}

impl UserField {
    pub const ALL: [UserField; 6] = [
        UserField::Email,
        UserField::FirstName,
        UserField::LastName,
        UserField::BirthDate,
        UserField::Address,
        UserField::PhoneNumber,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserField::Email => "email",
            UserField::FirstName => "firstName",
            UserField::LastName => "lastName",
            UserField::BirthDate => "birthDate",
            UserField::Address => "address",
            UserField::PhoneNumber => "phoneNumber",
        }
    }

    /// Look up a field by its wire name. Matching is exact.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse, string-valued modify payload as delivered by a transport.
///
/// Keys are not checked on construction; unknown keys are rejected when the
/// set is converted into a [`UserPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparseFieldSet(BTreeMap<String, String>);

impl SparseFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, field: UserField) -> Option<&str> {
        self.0.get(field.as_str()).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Keys that do not name a mergeable field, in sorted order.
    pub fn unknown_keys(&self) -> Vec<String> {
        self.keys()
            .filter(|k| UserField::parse(k).is_none())
            .map(str::to_owned)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for SparseFieldSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SparseFieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
