pub mod client;
pub mod error;
pub mod model;
pub mod page;

pub use client::UsersInfoApi;
pub use error::{StatusCategory, UsersInfoError};
pub use model::{NewUser, SparseFieldSet, User, UserField, UserId, UserPatch};
pub use page::{Page, PageInfo, PageRequest, Sort, SortDirection, SortField};
