//! User integration tests.
//!
//! Covers email and password handling, bans, and group and permission
//! checks through the SQLite authorization provider.

mod common;

use common::TestForum;
use forum_core::{ErrorKind, User, UserRepository};

#[test]
fn test_invalid_email_is_rejected_and_localized() {
    let forum = TestForum::new();
    let mut user = forum.create_user("alice", "alice@example.com");

    let err = user.set_email("not-an-email").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.localized(&forum.i18n), "The email address is not valid.");
    assert_eq!(user.email(), Some("alice@example.com"));
}

#[test]
fn test_email_stored_lowercase() {
    let forum = TestForum::new();
    let repo = UserRepository::new(&forum.db);
    let mut user = forum.create_user("alice", "alice@example.com");

    user.set_email("Alice.New@Example.COM").unwrap();
    let saved = repo.save(&user).unwrap().unwrap();

    assert_eq!(saved.email(), Some("alice.new@example.com"));
    assert!(repo.find_by_email("alice.new@example.com").unwrap().is_some());
}

#[test]
fn test_password_round_trip_through_storage() {
    let forum = TestForum::new();
    let repo = UserRepository::new(&forum.db);
    let mut user = forum.create_user("alice", "alice@example.com");

    user.set_password("correct horse", &forum.hasher()).unwrap();
    assert!(user.password_hash().starts_with("$argon2id$"));
    repo.save(&user).unwrap();

    let stored = repo.find(user.id).unwrap().unwrap();
    assert!(stored.verify_password("correct horse"));
    assert!(!stored.verify_password("battery staple"));
}

#[test]
fn test_ban_and_unban_persist() {
    let forum = TestForum::new();
    let repo = UserRepository::new(&forum.db);
    let mut user = forum.create_user("alice", "alice@example.com");
    assert!(!user.is_banned());

    user.ban_user("Spamming");
    repo.save(&user).unwrap();
    let stored = repo.find(user.id).unwrap().unwrap();
    assert!(stored.is_banned());
    assert_eq!(stored.status_message.as_deref(), Some("Spamming"));

    user.unban_user();
    repo.save(&user).unwrap();
    assert!(!repo.find(user.id).unwrap().unwrap().is_banned());
}

#[test]
fn test_short_username_rejected_on_create() {
    let forum = TestForum::new();
    let err = UserRepository::new(&forum.db)
        .create(&User::new("bob"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(
        err.localized(&forum.i18n),
        "The username must be at least 5 characters."
    );
}

#[test]
fn test_admin_and_moderator_groups() {
    let forum = TestForum::new();
    let auth = forum.auth();
    auth.create_group("admins", "Site administrators").unwrap();
    auth.create_group("moderators", "Forum moderators").unwrap();
    let user = forum.create_user("alice", "alice@example.com");

    assert!(!user.is_admin(&auth).unwrap());
    assert!(user.add_to_group("admins", &auth).unwrap());
    assert!(user.is_admin(&auth).unwrap());
    assert!(!user.is_moderator(&auth).unwrap());

    assert!(user.remove_from_group("admins", &auth).unwrap());
    assert!(!user.is_admin(&auth).unwrap());
}

#[test]
fn test_configured_group_names() {
    let forum = TestForum::with_extra_config(
        r#"
[auth]
admin_group = "staff"
"#,
    );
    let auth = forum.auth();
    auth.create_group("staff", "").unwrap();
    let user = forum.create_user("alice", "alice@example.com");

    user.add_to_group("staff", &auth).unwrap();
    assert!(user.is_admin(&auth).unwrap());
}

#[test]
fn test_in_group_matches_any() {
    let forum = TestForum::new();
    let auth = forum.auth();
    auth.create_group("writers", "").unwrap();
    auth.create_group("editors", "").unwrap();
    let user = forum.create_user("alice", "alice@example.com");
    user.add_to_group("editors", &auth).unwrap();

    assert!(user.in_group("editors", &auth).unwrap());
    assert!(user.in_group(&["writers", "editors"], &auth).unwrap());
    assert!(!user.in_group(&["writers", "admins"], &auth).unwrap());
}

#[test]
fn test_unknown_group_is_reported() {
    let forum = TestForum::new();
    let auth = forum.auth();
    let user = forum.create_user("alice", "alice@example.com");

    assert!(!user.add_to_group("nobody-made-this", &auth).unwrap());
    assert!(!user.in_group("nobody-made-this", &auth).unwrap());
}

#[test]
fn test_personal_and_group_permissions() {
    let forum = TestForum::new();
    let auth = forum.auth();
    auth.create_group("moderators", "").unwrap();
    auth.create_permission("threads.lock", "").unwrap();
    auth.create_permission("posts.edit", "").unwrap();
    auth.add_permission_to_group("threads.lock", "moderators").unwrap();
    let user = forum.create_user("alice", "alice@example.com");

    assert!(!user.has_permission("posts.edit", &auth).unwrap());
    assert!(user.add_permission("posts.edit", &auth).unwrap());
    assert!(user.has_permission("posts.edit", &auth).unwrap());

    user.add_to_group("moderators", &auth).unwrap();
    assert!(user.has_permission("threads.lock", &auth).unwrap());

    // Removing a personal grant leaves group grants alone
    user.remove_permission("threads.lock", &auth).unwrap();
    assert!(user.has_permission("threads.lock", &auth).unwrap());

    user.remove_permission("posts.edit", &auth).unwrap();
    assert!(!user.has_permission("posts.edit", &auth).unwrap());
}

#[test]
fn test_user_json_hides_secrets() {
    let forum = TestForum::new();
    let mut user = forum.create_user("alice", "alice@example.com");
    user.set_password("secret-pass", &forum.hasher()).unwrap();

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["username"], "alice");
    assert!(json.get("password_hash").is_none());
    assert!(json.get("reset_hash").is_none());
}
