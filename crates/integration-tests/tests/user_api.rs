//! End-to-end user API over HTTP through the SDK client

mod common;

use common::{client, start_server};
use tether_sdk::{BatchPolicy, ErrorCode, User};
use tokio_test::assert_ok;

fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
    }
}

#[tokio::test]
async fn test_create_list_and_lookup() {
    let handle = start_server().await;
    let client = client(&handle, BatchPolicy::immediate());

    assert_eq!(client.user_create("Alice").await.unwrap(), user("1", "Alice"));
    assert_eq!(client.user_create("Bob").await.unwrap(), user("2", "Bob"));

    assert_eq!(
        client.user_list().await.unwrap(),
        vec![user("1", "Alice"), user("2", "Bob")]
    );
    assert_eq!(
        client.user_by_id("1").await.unwrap(),
        Some(user("1", "Alice"))
    );
    assert_eq!(client.user_by_id("999").await.unwrap(), None);

    assert_ok!(handle.stop().await);
}

#[tokio::test]
async fn test_queries_are_idempotent() {
    let handle = start_server().await;
    let client = client(&handle, BatchPolicy::default());

    client.user_create("Alice").await.unwrap();

    let first = client.user_list().await.unwrap();
    let second = client.user_list().await.unwrap();
    assert_eq!(first, second);

    let a = client.user_by_id("1").await.unwrap();
    let b = client.user_by_id("1").await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_empty_store() {
    let handle = start_server().await;
    let client = client(&handle, BatchPolicy::default());

    assert!(client.user_list().await.unwrap().is_empty());
    assert_eq!(client.user_by_id("1").await.unwrap(), None);
}

#[tokio::test]
async fn test_invalid_name_is_bad_input() {
    let handle = start_server().await;
    let client = client(&handle, BatchPolicy::immediate());

    let err = client.user_create("  ").await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::BadInput));

    let err = client.user_create("x".repeat(200)).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::BadInput));

    // Failed creations leave the store untouched
    assert!(client.user_list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_procedure_and_kind_mismatch() {
    let handle = start_server().await;
    let client = client(&handle, BatchPolicy::immediate());

    let err = client
        .query::<_, serde_json::Value>("userDelete", &"1")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NotFound));

    // userCreate is a mutation
    let err = client
        .query::<_, serde_json::Value>("userCreate", &serde_json::json!({"name": "Eve"}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MethodNotSupported));
    assert!(client.user_list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clones_share_the_server_state() {
    let handle = start_server().await;
    let client = client(&handle, BatchPolicy::default());
    let other = client.clone();

    let created = client.user_create("Carol").await.unwrap();
    assert_eq!(other.user_by_id(&created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn test_name_is_stored_as_given() {
    let handle = start_server().await;
    let client = client(&handle, BatchPolicy::immediate());

    let created = client.user_create(" Alice").await.unwrap();
    assert_eq!(created, user("1", " Alice"));
    assert_eq!(client.user_by_id("1").await.unwrap(), Some(created));
}
