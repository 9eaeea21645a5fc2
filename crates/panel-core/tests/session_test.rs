#![allow(clippy::unwrap_used)]
// Integration tests for `SessionManager` against a wiremock backend.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use panel_core::{
    AuthState, CoreError, CredentialStore, MemoryCredentialStore, OfflinePolicy, SessionManager,
    User,
};

use common::{client_for, unreachable_url, user};

// ── Helpers ─────────────────────────────────────────────────────────

fn stored_token(store: &dyn CredentialStore) -> Option<String> {
    store.token().map(|t| t.expose_secret().to_owned())
}

fn seeded_store(token: &str, cached: Option<User>) -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::with_session(token, cached))
}

async fn manager_for(
    server: &MockServer,
    store: Arc<MemoryCredentialStore>,
    policy: OfflinePolicy,
) -> SessionManager {
    SessionManager::new(client_for(&server.uri(), store), policy)
}

async fn mount_validation(server: &MockServer, token: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/auth/session"))
        .and(body_json(json!({ "sessionToken": token })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

// ── start() ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_token_settles_unauthenticated_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let session = manager_for(&server, store, OfflinePolicy::default()).await;

    assert_eq!(session.start().await, AuthState::Unauthenticated);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_valid_token_authenticates_and_refreshes_cached_user() {
    let server = MockServer::start().await;
    let fresh = user(1, "Ada Lovelace");
    mount_validation(
        &server,
        "T",
        ResponseTemplate::new(200).set_body_json(json!({ "valid": true, "user": fresh })),
    )
    .await;

    let store = seeded_store("T", Some(user(1, "Ada")));
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    assert_eq!(session.start().await, AuthState::Authenticated(fresh.clone()));
    assert_eq!(session.user(), Some(fresh.clone()));
    assert_eq!(stored_token(&*store).as_deref(), Some("T"));
    assert_eq!(store.cached_user(), Some(fresh));
}

#[tokio::test]
async fn test_null_user_fields_still_authenticate() {
    let server = MockServer::start().await;
    mount_validation(
        &server,
        "T",
        ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "user": { "id": 1, "name": "Ada", "email": "ada@example.com", "role": null }
        })),
    )
    .await;

    let store = seeded_store("T", None);
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    let state = session.start().await;

    let AuthState::Authenticated(signed_in) = state else {
        panic!("expected Authenticated, got {state:?}");
    };
    assert_eq!(signed_in.name, "Ada");
    assert_eq!(signed_in.role, "");
    assert_eq!(stored_token(&*store).as_deref(), Some("T"));
    assert_eq!(store.cached_user(), Some(signed_in));
}

#[tokio::test]
async fn test_invalid_token_clears_store() {
    let server = MockServer::start().await;
    mount_validation(
        &server,
        "T",
        ResponseTemplate::new(200).set_body_json(json!({ "valid": false })),
    )
    .await;

    let store = seeded_store("T", Some(user(1, "Ada")));
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    assert_eq!(session.start().await, AuthState::Unauthenticated);
    assert!(store.token().is_none());
    assert!(store.cached_user().is_none());
}

#[tokio::test]
async fn test_valid_without_user_is_treated_as_invalid() {
    let server = MockServer::start().await;
    mount_validation(
        &server,
        "T",
        ResponseTemplate::new(200).set_body_json(json!({ "valid": true })),
    )
    .await;

    let store = seeded_store("T", None);
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    assert_eq!(session.start().await, AuthState::Unauthenticated);
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_rejected_validation_clears_store() {
    let server = MockServer::start().await;
    mount_validation(&server, "T", ResponseTemplate::new(401)).await;

    let store = seeded_store("T", Some(user(1, "Ada")));
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    assert_eq!(session.start().await, AuthState::Unauthenticated);
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_unparseable_validation_body_clears_store() {
    let server = MockServer::start().await;
    mount_validation(
        &server,
        "T",
        ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
    )
    .await;

    let store = seeded_store("T", Some(user(1, "Ada")));
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    assert_eq!(session.start().await, AuthState::Unauthenticated);
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_unreachable_backend_trusts_cached_user() {
    let cached = user(7, "Grace");
    let store = seeded_store("T", Some(cached.clone()));
    let client = client_for(&unreachable_url().await, store.clone());
    let session = SessionManager::new(client, OfflinePolicy::TrustCachedUser);

    assert_eq!(session.start().await, AuthState::Authenticated(cached));
    assert_eq!(stored_token(&*store).as_deref(), Some("T"));
}

#[tokio::test]
async fn test_unreachable_backend_without_cached_user_signs_out() {
    let store = seeded_store("T", None);
    let client = client_for(&unreachable_url().await, store.clone());
    let session = SessionManager::new(client, OfflinePolicy::TrustCachedUser);

    assert_eq!(session.start().await, AuthState::Unauthenticated);
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_reject_policy_signs_out_when_unreachable() {
    let store = seeded_store("T", Some(user(7, "Grace")));
    let client = client_for(&unreachable_url().await, store.clone());
    let session = SessionManager::new(client, OfflinePolicy::Reject);

    assert_eq!(session.start().await, AuthState::Unauthenticated);
    assert!(store.token().is_none());
    assert!(store.cached_user().is_none());
}

#[tokio::test]
async fn test_start_passes_through_validating() {
    let server = MockServer::start().await;
    mount_validation(
        &server,
        "T",
        ResponseTemplate::new(200)
            .set_body_json(json!({ "valid": true, "user": user(1, "Ada") }))
            .set_delay(std::time::Duration::from_millis(100)),
    )
    .await;

    let store = seeded_store("T", None);
    let session = manager_for(&server, store, OfflinePolicy::default()).await;
    let mut rx = session.subscribe();

    let (final_state, observed) = tokio::join!(session.start(), async {
        rx.changed().await.unwrap();
        rx.borrow_and_update().clone()
    });

    assert_eq!(observed, AuthState::Validating);
    assert!(final_state.is_authenticated());
}

// ── login() / login_with_token() ────────────────────────────────────

#[tokio::test]
async fn test_login_writes_store_then_authenticates() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryCredentialStore::new());
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;
    let ada = user(1, "Ada");

    session
        .login(SecretString::from("fresh-token"), ada.clone())
        .unwrap();

    assert_eq!(session.state(), AuthState::Authenticated(ada.clone()));
    assert_eq!(stored_token(&*store).as_deref(), Some("fresh-token"));
    assert_eq!(store.cached_user(), Some(ada));
}

#[tokio::test]
async fn test_login_with_token_uses_reported_user() {
    let server = MockServer::start().await;
    let ada = user(1, "Ada");
    mount_validation(
        &server,
        "issued",
        ResponseTemplate::new(200).set_body_json(json!({ "valid": true, "user": ada })),
    )
    .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    let signed_in = session
        .login_with_token(SecretString::from("issued"))
        .await
        .unwrap();

    assert_eq!(signed_in, ada);
    assert!(session.is_authenticated());
    assert_eq!(stored_token(&*store).as_deref(), Some("issued"));
}

#[tokio::test]
async fn test_login_with_rejected_token_leaves_state_alone() {
    let server = MockServer::start().await;
    mount_validation(
        &server,
        "bad",
        ResponseTemplate::new(200).set_body_json(json!({ "valid": false })),
    )
    .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    let err = session
        .login_with_token(SecretString::from("bad"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidSession));
    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_login_with_token_sends_new_token_as_bearer() {
    let server = MockServer::start().await;
    let grace = user(2, "Grace");
    Mock::given(method("POST"))
        .and(path("/api/auth/session"))
        .and(header("authorization", "Bearer fresh"))
        .and(body_json(json!({ "sessionToken": "fresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "valid": true, "user": grace })))
        .expect(1)
        .mount(&server)
        .await;

    let store = seeded_store("stale", Some(user(1, "Ada")));
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;

    let signed_in = session
        .login_with_token(SecretString::from("fresh"))
        .await
        .unwrap();

    assert_eq!(signed_in, grace);
    assert_eq!(stored_token(&*store).as_deref(), Some("fresh"));
}

// ── logout() ────────────────────────────────────────────────────────

async fn assert_logout_clears(response: ResponseTemplate) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(body_json(json!({ "sessionToken": "T" })))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let session = manager_for(&server, store.clone(), OfflinePolicy::default()).await;
    session
        .login(SecretString::from("T"), user(1, "Ada"))
        .unwrap();

    session.logout().await;

    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert!(store.token().is_none());
    assert!(store.cached_user().is_none());
}

#[tokio::test]
async fn test_logout_success() {
    assert_logout_clears(ResponseTemplate::new(200).set_body_json(json!({ "ok": true }))).await;
}

#[tokio::test]
async fn test_logout_server_error_still_clears() {
    assert_logout_clears(ResponseTemplate::new(500)).await;
}

#[tokio::test]
async fn test_logout_unreachable_still_clears() {
    let store = Arc::new(MemoryCredentialStore::new());
    let client = client_for(&unreachable_url().await, store.clone());
    let session = SessionManager::new(client, OfflinePolicy::default());
    session
        .login(SecretString::from("T"), user(1, "Ada"))
        .unwrap();

    session.logout().await;

    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_logout_without_token_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let session = manager_for(&server, store, OfflinePolicy::default()).await;

    session.logout().await;
    assert_eq!(session.state(), AuthState::Unauthenticated);
}
