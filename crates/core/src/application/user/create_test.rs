//! Unit tests for user creation and lookups

use super::create::validate_request;
use super::*;
use crate::domain::{DomainError, NewUser};
use crate::error::AppError;
use crate::port::{IdProvider, SequentialIdProvider};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_test::{assert_err, assert_ok};

/// Minimal store so the service can be tested without an adapter crate
#[derive(Default)]
struct FakeStore {
    users: Mutex<Vec<User>>,
    ids: SequentialIdProvider,
}

#[async_trait]
impl UserStore for FakeStore {
    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.lock().await.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let user = new_user.into_user(self.ids.generate_id());
        self.users.lock().await.push(user.clone());
        Ok(user)
    }
}

/// Store whose backend is unavailable
struct BrokenStore;

#[async_trait]
impl UserStore for BrokenStore {
    async fn list(&self) -> Result<Vec<User>> {
        Err(AppError::Store("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<User>> {
        Err(AppError::Store("connection refused".to_string()))
    }

    async fn create(&self, _new_user: NewUser) -> Result<User> {
        Err(AppError::Store("connection refused".to_string()))
    }
}

fn service() -> UserService {
    UserService::new(Arc::new(FakeStore::default()))
}

fn request(name: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: name.to_string(),
    }
}

#[test]
fn test_validate_name_empty() {
    let result = validate_request(&request(""));
    assert!(matches!(
        result,
        Err(AppError::Domain(DomainError::EmptyName))
    ));
}

#[test]
fn test_validate_name_ok() {
    let new_user = assert_ok!(validate_request(&request("Alice")));
    assert_eq!(new_user.name(), "Alice");
}

#[tokio::test]
async fn test_create_assigns_sequential_ids() {
    let service = service();

    let alice = service.create(request("Alice")).await.unwrap();
    let bob = service.create(request("Bob")).await.unwrap();

    assert_eq!(alice.id, "1");
    assert_eq!(alice.name, "Alice");
    assert_eq!(bob.id, "2");
    assert_eq!(bob.name, "Bob");
}

#[tokio::test]
async fn test_invalid_create_does_not_touch_store() {
    let service = service();

    assert_err!(service.create(request("  ")).await);

    assert!(service.list().await.unwrap().is_empty());
    let first = service.create(request("Carol")).await.unwrap();
    assert_eq!(first.id, "1");
}

#[tokio::test]
async fn test_list_and_find() {
    let service = service();
    service.create(request("Alice")).await.unwrap();
    service.create(request("Bob")).await.unwrap();

    let users = service.list().await.unwrap();
    let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    let found = service.find_by_id("1").await.unwrap();
    assert_eq!(found.map(|u| u.name), Some("Alice".to_string()));

    // Missing user is an absent value, not an error
    assert_eq!(service.find_by_id("999").await.unwrap(), None);
}

#[tokio::test]
async fn test_reads_are_repeatable() {
    let service = service();
    service.create(request("Alice")).await.unwrap();

    let first = service.list().await.unwrap();
    let second = service.list().await.unwrap();
    assert_eq!(first, second);

    assert_eq!(
        service.find_by_id("1").await.unwrap(),
        service.find_by_id("1").await.unwrap()
    );
}

#[tokio::test]
async fn test_store_failures_propagate() {
    let service = UserService::new(Arc::new(BrokenStore));

    assert!(matches!(service.list().await, Err(AppError::Store(_))));
    assert!(matches!(
        service.find_by_id("1").await,
        Err(AppError::Store(_))
    ));
    assert!(matches!(
        service.create(request("Alice")).await,
        Err(AppError::Store(_))
    ));
}
