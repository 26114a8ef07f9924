use std::sync::Arc;

use chrono::NaiveDate;
use users_info::api::error::ErrorResponse;
use users_info::contract::{
    client::UsersInfoApi, error::UsersInfoError, model::*, PageRequest, StatusCategory,
};
use users_info::domain::error::DomainError;
use users_info::domain::ports::FixedClock;
use users_info::domain::service::{Service, ServiceConfig};
use users_info::gateways::local::UsersInfoLocalClient;
use users_info::infra::storage::InMemoryUsersRepository;
// Note: These internal module imports are only for testing
// External consumers should only use the `contract` module

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn client() -> UsersInfoLocalClient {
    let service = Service::new(
        Arc::new(InMemoryUsersRepository::new()),
        Arc::new(FixedClock(d(2024, 6, 15))),
        ServiceConfig::default(),
    );
    UsersInfoLocalClient::new(Arc::new(service))
}

fn adult() -> NewUser {
    NewUser {
        email: "adult@example.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        birth_date: d(1994, 6, 15),
        address: None,
        phone_number: None,
    }
}

#[test]
fn test_user_field_names() {
    let names: Vec<_> = UserField::ALL.iter().map(|f| f.as_str()).collect();
    assert_eq!(
        names,
        vec!["email", "firstName", "lastName", "birthDate", "address", "phoneNumber"]
    );
    assert_eq!(UserField::parse("birthDate"), Some(UserField::BirthDate));
    assert_eq!(UserField::parse("id"), None);
}

#[test]
fn test_contract_errors() {
    let error = UsersInfoError::not_found(7);
    match error {
        UsersInfoError::NotFound { id } => assert_eq!(id, 7),
        _ => panic!("Expected NotFound error"),
    }

    let error = UsersInfoError::validation("Invalid field: nickname");
    assert_eq!(error.to_string(), "Invalid field: nickname");
    assert_eq!(error.category(), StatusCategory::BadInput);

    assert_eq!(UsersInfoError::internal().category(), StatusCategory::Internal);
}

#[test]
fn test_every_domain_error_has_a_status() {
    let cases = [
        (DomainError::invalid_field("email", "bad"), 400),
        (DomainError::unknown_field(vec!["x".into()]), 400),
        (DomainError::min_age(18), 400),
        (DomainError::invalid_range(d(2000, 1, 2), d(2000, 1, 1)), 400),
        (DomainError::user_not_found(1), 404),
        (DomainError::conflict("row 1"), 409),
        (DomainError::database("boom"), 500),
    ];
    for (err, status) in cases {
        assert_eq!(err.category().status_code().as_u16(), status, "{err}");
        assert_eq!(ErrorResponse::from_domain(&err).status_code, status);
    }
}

#[tokio::test]
async fn test_local_client_round_trip() {
    let client = client();

    let created = client.create_user(adult()).await.unwrap();
    assert_eq!(client.get_user(created.id).await.unwrap(), created);

    let fields: SparseFieldSet = [("address", "London")].into_iter().collect();
    let modified = client.modify_user(created.id, fields).await.unwrap();
    assert_eq!(modified.address.as_deref(), Some("London"));

    let page = client
        .list_users(d(1990, 1, 1), d(2000, 1, 1), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items, vec![modified]);

    client.delete_user(created.id).await.unwrap();
    assert_eq!(
        client.get_user(created.id).await.unwrap_err(),
        UsersInfoError::not_found(created.id)
    );
}

#[tokio::test]
async fn test_local_client_preserves_messages() {
    let client = client();

    let young = NewUser {
        birth_date: d(2014, 1, 1),
        ..adult()
    };
    let err = client.create_user(young).await.unwrap_err();
    assert_eq!(err, UsersInfoError::validation("User must be older than 18"));

    let err = client
        .list_users(d(1996, 1, 1), d(1992, 1, 1), PageRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "from date must be less than to date");

    let err = client
        .replace_user(99, adult())
        .await
        .unwrap_err();
    assert_eq!(err.category(), StatusCategory::NotFound);
}
