use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contract::{NewUser, Page, PageInfo, SparseFieldSet, User, UserField, UserId};
use crate::domain::error::DomainError;
use crate::domain::validation::{check_raw_fields, parse_date};

/// Create/replace request body. Every attribute must be supplied except the optional ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserReq {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl UserReq {
    /// Convert into a [`NewUser`], running every field rule on the attributes as
    /// received. Missing attributes and content violations are reported together.
    /// Age eligibility is left to the service.
    pub fn into_new_user(self, today: NaiveDate) -> Result<NewUser, DomainError> {
        let violations = check_raw_fields(
            &[
                (UserField::Email, self.email.as_deref()),
                (UserField::FirstName, self.first_name.as_deref()),
                (UserField::LastName, self.last_name.as_deref()),
                (UserField::BirthDate, self.birth_date.as_deref()),
                (UserField::Address, self.address.as_deref()),
                (UserField::PhoneNumber, self.phone_number.as_deref()),
            ],
            today,
        );
        let birth_date = self.birth_date.as_deref().and_then(parse_date);

        match (self.email, self.first_name, self.last_name, birth_date) {
            (Some(email), Some(first_name), Some(last_name), Some(birth_date))
                if violations.is_empty() =>
            {
                Ok(NewUser {
                    email,
                    first_name,
                    last_name,
                    birth_date,
                    address: self.address,
                    phone_number: self.phone_number,
                })
            }
            _ => Err(DomainError::validation(violations)),
        }
    }
}

/// Modify request body: a flat map of attribute name to raw value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifyUserReq(pub BTreeMap<String, String>);

impl From<ModifyUserReq> for SparseFieldSet {
    fn from(req: ModifyUserReq) -> Self {
        SparseFieldSet::from(req.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            birth_date: user.birth_date,
            address: user.address,
            phone_number: user.phone_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoDto {
    pub offset: u64,
    pub limit: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
}

impl From<PageInfo> for PageInfoDto {
    fn from(info: PageInfo) -> Self {
        Self {
            offset: info.offset,
            limit: info.limit,
            total_elements: info.total_elements,
            total_pages: info.total_pages,
            number_of_elements: info.number_of_elements,
            first: info.first,
            last: info.last,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPageDto {
    pub content: Vec<UserDto>,
    pub page: PageInfoDto,
}

impl From<Page<User>> for UserPageDto {
    fn from(page: Page<User>) -> Self {
        let page = page.map_items(UserDto::from);
        Self {
            content: page.items,
            page: page.page_info.into(),
        }
    }
}
