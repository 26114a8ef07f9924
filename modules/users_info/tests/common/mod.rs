#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use users_info::contract::NewUser;
use users_info::domain::ports::FixedClock;
use users_info::domain::service::{Service, ServiceConfig};
use users_info::infra::storage::InMemoryUsersRepository;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn today() -> NaiveDate {
    d(2024, 6, 15)
}

pub fn new_user(email: &str, birth_date: NaiveDate) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        birth_date,
        address: Some("1 Main St".to_string()),
        phone_number: None,
    }
}

pub fn service_with(config: ServiceConfig) -> (Service, Arc<InMemoryUsersRepository>) {
    let repo = Arc::new(InMemoryUsersRepository::new());
    let service = Service::new(repo.clone(), Arc::new(FixedClock(today())), config);
    (service, repo)
}

pub fn service() -> (Service, Arc<InMemoryUsersRepository>) {
    service_with(ServiceConfig::default())
}
