//! Integration tests for the user administration service.

use std::collections::HashSet;

use atria_auth::encoder::Argon2PasswordEncoder;
use atria_auth::service::UserService;
use atria_core::command::JsonCommand;
use atria_core::error::AtriaError;
use atria_core::models::client::{Client, ClientMapping};
use atria_core::models::office::Office;
use atria_core::models::role::Role;
use atria_core::models::user::SYSTEM_USER_NAME;
use atria_core::repository::UserRepository;
use atria_store::MemoryUserRepository;
use serde_json::json;
use uuid::Uuid;

fn setup() -> (
    UserService<MemoryUserRepository, Argon2PasswordEncoder>,
    MemoryUserRepository,
) {
    let repo = MemoryUserRepository::new();
    let svc = UserService::new(repo.clone(), Argon2PasswordEncoder::new());
    (svc, repo)
}

fn create_command(username: &str) -> JsonCommand {
    JsonCommand::from_value(json!({
        "username": username,
        "password": "correct-horse-battery",
        "email": format!("{username}@example.com"),
        "firstname": "Alice",
        "lastname": "Doe",
    }))
}

fn teller_roles() -> HashSet<Role> {
    [Role::new("teller", "branch teller").grant("READ_CLIENT")]
        .into_iter()
        .collect()
}

#[tokio::test]
async fn create_user_encodes_password_and_persists() {
    let (svc, repo) = setup();

    let user = svc
        .create_user(
            &create_command("alice"),
            Office::new("Head Office"),
            None,
            teller_roles(),
            &[],
        )
        .await
        .unwrap();

    assert_eq!(user.username(), "alice");
    assert_ne!(user.password(), "correct-horse-battery");
    assert!(user.password().starts_with("$argon2id$"));
    assert!(user.is_first_time_login_remaining());
    assert!(user.has_permission_to("READ_CLIENT"));

    let stored = repo.get_by_username("alice").await.unwrap();
    assert_eq!(stored.id(), user.id());
    assert_eq!(stored.password(), user.password());
}

#[tokio::test]
async fn create_user_rejects_duplicate_username() {
    let (svc, _repo) = setup();

    svc.create_user(
        &create_command("alice"),
        Office::new("Head Office"),
        None,
        HashSet::new(),
        &[],
    )
    .await
    .unwrap();

    let err = svc
        .create_user(
            &create_command("alice"),
            Office::new("Head Office"),
            None,
            HashSet::new(),
            &[],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AtriaError::AlreadyExists { .. }));
}

#[tokio::test]
async fn change_password_applies_and_stamps() {
    let (svc, repo) = setup();
    let user = svc
        .create_user(
            &create_command("alice"),
            Office::new("Head Office"),
            None,
            HashSet::new(),
            &[],
        )
        .await
        .unwrap();
    let old_encoded = user.password().to_string();

    let changed = svc
        .change_password(
            user.id(),
            &JsonCommand::from_value(json!({ "password": "brand-new-secret" })),
        )
        .await
        .unwrap();

    assert_ne!(changed.password(), old_encoded);
    assert!(!changed.is_first_time_login_remaining());

    let stored = repo.get_by_id(user.id()).await.unwrap();
    assert_eq!(stored.password(), changed.password());
}

#[tokio::test]
async fn change_password_with_same_value_is_a_noop() {
    let (svc, _repo) = setup();
    let user = svc
        .create_user(
            &create_command("alice"),
            Office::new("Head Office"),
            None,
            HashSet::new(),
            &[],
        )
        .await
        .unwrap();

    let unchanged = svc
        .change_password(
            user.id(),
            &JsonCommand::from_value(json!({ "password": "correct-horse-battery" })),
        )
        .await
        .unwrap();

    assert_eq!(unchanged.password(), user.password());
    // The first-time-login marker survives a no-op.
    assert!(unchanged.is_first_time_login_remaining());
}

#[tokio::test]
async fn change_password_respects_locked_policy() {
    let (svc, _repo) = setup();
    let command = JsonCommand::from_value(json!({
        "username": "locked",
        "password": "correct-horse-battery",
        "cannotChangePassword": true,
    }));
    let user = svc
        .create_user(&command, Office::new("Head Office"), None, HashSet::new(), &[])
        .await
        .unwrap();

    let err = svc
        .change_password(
            user.id(),
            &JsonCommand::from_value(json!({ "password": "brand-new-secret" })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AtriaError::Unauthorized { .. }));
}

#[tokio::test]
async fn soft_delete_frees_the_username() {
    let (svc, repo) = setup();
    let user = svc
        .create_user(
            &create_command("alice"),
            Office::new("Head Office"),
            None,
            teller_roles(),
            &[],
        )
        .await
        .unwrap();

    let deleted = svc.soft_delete(user.id()).await.unwrap();
    assert!(deleted.is_deleted());
    assert!(deleted.is_not_enabled());
    assert!(deleted.roles().is_empty());
    assert_eq!(
        deleted.username(),
        format!("{}_DELETED_alice", user.id())
    );

    assert!(matches!(
        repo.get_by_username("alice").await,
        Err(AtriaError::NotFound { .. })
    ));
}

#[tokio::test]
async fn soft_delete_refuses_the_system_user() {
    let (svc, repo) = setup();
    let user = svc
        .create_user(
            &create_command(SYSTEM_USER_NAME),
            Office::new("Head Office"),
            None,
            HashSet::new(),
            &[],
        )
        .await
        .unwrap();

    let err = svc.soft_delete(user.id()).await.unwrap_err();
    assert!(matches!(err, AtriaError::Unauthorized { .. }));

    let stored = repo.get_by_id(user.id()).await.unwrap();
    assert!(!stored.is_deleted());
}

#[tokio::test]
async fn soft_delete_of_unknown_user_is_not_found() {
    let (svc, _repo) = setup();
    assert!(matches!(
        svc.soft_delete(Uuid::new_v4()).await,
        Err(AtriaError::NotFound { .. })
    ));
}

#[tokio::test]
async fn update_roles_replaces_the_set() {
    let (svc, _repo) = setup();
    let user = svc
        .create_user(
            &create_command("alice"),
            Office::new("Head Office"),
            None,
            teller_roles(),
            &[],
        )
        .await
        .unwrap();

    let replacement: HashSet<Role> = [Role::new("auditor", "").grant("READ_AUDIT")]
        .into_iter()
        .collect();
    let updated = svc.update_roles(user.id(), replacement).await.unwrap();

    assert!(!updated.has_permission_to("READ_CLIENT"));
    assert!(updated.has_permission_to("READ_AUDIT"));
}

#[tokio::test]
async fn set_clients_reconciles_the_allow_list() {
    let (svc, _repo) = setup();
    let c1 = Client::new("C1");
    let c2 = Client::new("C2");
    let c3 = Client::new("C3");

    let command = JsonCommand::from_value(json!({
        "username": "selfie",
        "password": "correct-horse-battery",
        "isSelfServiceUser": true,
    }));
    let user = svc
        .create_user(
            &command,
            Office::new("Head Office"),
            None,
            HashSet::new(),
            &[c1.clone(), c2.clone()],
        )
        .await
        .unwrap();
    assert_eq!(user.client_mappings().len(), 2);

    let updated = svc
        .set_clients(user.id(), &[c2.clone(), c3.clone()])
        .await
        .unwrap();

    assert_eq!(updated.client_mappings().len(), 2);
    assert!(updated.client_mappings().contains(&ClientMapping::new(&c2)));
    assert!(updated.client_mappings().contains(&ClientMapping::new(&c3)));
    assert!(!updated.client_mappings().contains(&ClientMapping::new(&c1)));
}
