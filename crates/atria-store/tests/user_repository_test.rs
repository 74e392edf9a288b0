//! Integration tests for the in-memory user repository.

use std::collections::HashSet;

use atria_core::command::JsonCommand;
use atria_core::error::AtriaError;
use atria_core::models::office::Office;
use atria_core::models::user::AppUser;
use atria_core::repository::{Pagination, UserRepository};
use atria_store::MemoryUserRepository;
use serde_json::json;
use uuid::Uuid;

fn user(username: &str) -> AppUser {
    let command = JsonCommand::from_value(json!({
        "username": username,
        "password": "encoded-pw",
        "email": format!("{username}@example.com"),
        "firstname": "Test",
        "lastname": "User",
    }));
    AppUser::from_command(Office::new("Head Office"), None, HashSet::new(), &[], &command).unwrap()
}

#[tokio::test]
async fn save_and_lookup() {
    let repo = MemoryUserRepository::new();
    let saved = repo.save(user("alice")).await.unwrap();

    let by_id = repo.get_by_id(saved.id()).await.unwrap();
    assert_eq!(by_id.username(), "alice");

    let by_username = repo.get_by_username("alice").await.unwrap();
    assert_eq!(by_username.id(), saved.id());
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let repo = MemoryUserRepository::new();
    assert!(matches!(
        repo.get_by_id(Uuid::new_v4()).await,
        Err(AtriaError::NotFound { .. })
    ));
    assert!(matches!(
        repo.get_by_username("nobody").await,
        Err(AtriaError::NotFound { .. })
    ));
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let repo = MemoryUserRepository::new();
    repo.save(user("alice")).await.unwrap();

    let err = repo.save(user("alice")).await.unwrap_err();
    assert!(matches!(err, AtriaError::AlreadyExists { .. }));
}

#[tokio::test]
async fn resaving_the_same_user_is_not_a_conflict() {
    let repo = MemoryUserRepository::new();
    let mut saved = repo.save(user("alice")).await.unwrap();

    saved.set_email("new@example.com");
    let resaved = repo.save(saved).await.unwrap();
    assert_eq!(resaved.email(), "new@example.com");
}

#[tokio::test]
async fn soft_deleted_users_are_hidden_and_free_their_username() {
    let repo = MemoryUserRepository::new();
    let mut alice = repo.save(user("alice")).await.unwrap();
    let alice_id = alice.id();

    alice.delete().unwrap();
    repo.save(alice).await.unwrap();

    assert!(matches!(
        repo.get_by_id(alice_id).await,
        Err(AtriaError::NotFound { .. })
    ));
    assert!(matches!(
        repo.get_by_username("alice").await,
        Err(AtriaError::NotFound { .. })
    ));

    // The original username is available again.
    let replacement = repo.save(user("alice")).await.unwrap();
    assert_ne!(replacement.id(), alice_id);
}

#[tokio::test]
async fn list_is_ordered_and_paginated() {
    let repo = MemoryUserRepository::new();
    for name in ["carol", "alice", "bob"] {
        repo.save(user(name)).await.unwrap();
    }

    let mut deleted = repo.save(user("dave")).await.unwrap();
    deleted.delete().unwrap();
    repo.save(deleted).await.unwrap();

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    let names: Vec<&str> = page.items.iter().map(|u| u.username()).collect();
    assert_eq!(names, ["alice", "bob"]);

    let rest = repo
        .list(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    let names: Vec<&str> = rest.items.iter().map(|u| u.username()).collect();
    assert_eq!(names, ["carol"]);
}
