//! In-process repository implementation for the domain port.
//!
//! Rows live in a `BTreeMap` keyed by id behind one `RwLock`, so every write
//! is applied atomically with respect to other writes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::bail;
use parking_lot::RwLock;

use crate::contract::{NewUser, Page, PageRequest, SortDirection, SortField, User, UserId};
use crate::domain::range::BirthDateRange;
use crate::domain::repo::UsersRepository;

struct State {
    users: BTreeMap<UserId, User>,
    next_id: UserId,
}

/// Ids are assigned sequentially starting at 1 and never reused.
pub struct InMemoryUsersRepository {
    state: RwLock<State>,
}

impl Default for InMemoryUsersRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.state.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compare(a: &User, b: &User, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::BirthDate => a.birth_date.cmp(&b.birth_date),
        SortField::Email => a.email.cmp(&b.email),
        SortField::LastName => a.last_name.cmp(&b.last_name),
    }
}

#[async_trait::async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        Ok(self.state.read().users.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: UserId) -> anyhow::Result<bool> {
        Ok(self.state.read().users.contains_key(&id))
    }

    async fn insert(&self, new_user: NewUser) -> anyhow::Result<User> {
        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;
        let user = new_user.with_id(id);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> anyhow::Result<()> {
        let mut state = self.state.write();
        match state.users.get_mut(&user.id) {
            Some(row) => {
                *row = user;
                Ok(())
            }
            None => bail!("update failed: no row with id {}", user.id),
        }
    }

    async fn delete(&self, id: UserId) -> anyhow::Result<bool> {
        Ok(self.state.write().users.remove(&id).is_some())
    }

    async fn list_by_birth_date(
        &self,
        range: &BirthDateRange,
        page: &PageRequest,
    ) -> anyhow::Result<Page<User>> {
        let Some(limit) = page.limit else {
            bail!("list_by_birth_date requires a resolved page limit");
        };

        let mut matching: Vec<User> = self
            .state
            .read()
            .users
            .values()
            .filter(|u| range.contains(u.birth_date))
            .cloned()
            .collect();

        let sort = page.sort;
        matching.sort_by(|a, b| {
            let primary = match sort.direction {
                SortDirection::Asc => compare(a, b, sort.field),
                SortDirection::Desc => compare(b, a, sort.field),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let items: Vec<User> = matching
            .into_iter()
            .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect();

        Ok(Page::new(items, page.offset, limit, total))
    }
}
