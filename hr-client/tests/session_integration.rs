// hr-client/tests/session_integration.rs

mod common;

use common::TestEnv;
use hr_client::{
    ClientError, EmployeeRepository, ListQuery, PersistedSession, SessionEvent, SessionStorage,
    SessionStore,
};
use hr_mock::MockState;
use tempfile::TempDir;

#[tokio::test]
async fn test_login_persists_and_rehydrates() {
    let env = TestEnv::start(MockState::new()).await;
    let mut events = env.store.subscribe();

    let session = env
        .store
        .login(&env.gateway, "admin", "admin123")
        .await
        .unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.username(), Some("admin"));
    assert!(session.has_role(["ADMIN"]));
    assert_eq!(session.refresh_token(), Some("refresh-admin"));
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedIn {
            username: "admin".into()
        }
    );

    // A fresh store over the same directory sees the same session
    let reopened = SessionStore::open(SessionStorage::new(env.dir.path()));
    assert!(reopened.is_authenticated());
    assert_eq!(reopened.token(), env.store.token());
    assert!(reopened.has_role(["ADMIN", "RH"]));
}

#[tokio::test]
async fn test_bad_credentials_are_generic() {
    let env = TestEnv::start(MockState::new()).await;

    let err = env
        .store
        .login(&env.gateway, "admin", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Authentication));
    assert_eq!(err.user_message(), "Usuario o contraseña incorrectos");
    assert!(!env.store.is_authenticated());
    assert!(!env.store.storage().exists());
}

#[tokio::test]
async fn test_network_failure_on_login_is_authentication_error() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::open(SessionStorage::new(dir.path()));
    // Nothing listens on port 9 (discard) locally
    let config = hr_client::ClientConfig::new("http://127.0.0.1:9");
    let gateway = hr_client::ApiGateway::new(&config, store.clone()).unwrap();

    let err = store.login(&gateway, "admin", "admin123").await.unwrap_err();
    assert!(matches!(err, ClientError::Authentication));
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let env = TestEnv::start(MockState::new()).await;
    env.login_admin().await;
    assert!(env.store.storage().exists());

    env.store.logout().unwrap();
    assert!(!env.store.is_authenticated());
    assert!(env.store.snapshot().roles().is_empty());
    assert!(!env.store.storage().exists());

    env.store.logout().unwrap();
    assert!(!env.store.is_authenticated());
}

#[tokio::test]
async fn test_partial_persisted_session_starts_unauthenticated() {
    let dir = TempDir::new().unwrap();
    let storage = SessionStorage::new(dir.path());
    storage
        .save(&PersistedSession {
            access_token: Some("tok".into()),
            refresh_token: None,
            username: Some("rh".into()),
            roles: None,
        })
        .unwrap();

    let store = SessionStore::open(storage);
    assert!(!store.is_authenticated());
    assert!(store.token().is_none());
    assert!(!store.has_role(["RH"]));
}

#[tokio::test]
async fn test_client_supplied_session() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::open(SessionStorage::new(dir.path()));
    store
        .set_session("external-token", Some("r".into()), "rh.user", ["RH"])
        .unwrap();

    assert_eq!(store.token().as_deref(), Some("external-token"));
    let persisted = store.storage().load().unwrap();
    assert_eq!(persisted.access_token.as_deref(), Some("external-token"));
    assert_eq!(persisted.roles, Some(vec!["RH".to_string()]));
}

#[tokio::test]
async fn test_repeated_401_expires_exactly_once() {
    let env = TestEnv::start(MockState::with_demo_employees(5)).await;
    env.login_admin().await;
    let mut events = env.gateway.subscribe();

    env.server.state.revoke_all_tokens();

    let first = env.repo.list(&ListQuery::new(0, 20)).await.unwrap_err();
    let second = env.repo.list(&ListQuery::new(0, 20)).await.unwrap_err();
    assert!(first.is_session_expired());
    assert!(second.is_session_expired());

    assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
    assert!(events.try_recv().is_err());

    assert!(!env.store.is_authenticated());
    assert!(!env.store.storage().exists());
}

#[tokio::test]
async fn test_late_401_leaves_newer_session_alone() {
    let env = TestEnv::start(MockState::with_demo_employees(5)).await;
    env.login_admin().await;
    let old_token = env.store.token().unwrap();

    env.server.state.revoke_all_tokens();
    env.server
        .state
        .set_reject_delay(std::time::Duration::from_millis(300));
    let mut events = env.gateway.subscribe();

    // the list call is signed with the old token; a new login lands before its 401
    let query = ListQuery::new(0, 20);
    let (listed, _) = tokio::join!(env.repo.list(&query), async {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        env.login_admin().await;
    });

    assert!(listed.unwrap_err().is_session_expired());
    assert!(env.store.is_authenticated());
    assert_ne!(env.store.token(), Some(old_token));
    assert!(env.store.storage().exists());
    assert!(matches!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedIn { .. }
    ));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_blank_client_token_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::open(SessionStorage::new(dir.path()));

    let err = store.set_session("  ", None, "rh.user", ["RH"]).unwrap_err();
    assert!(matches!(err, ClientError::Authentication));
    assert!(!store.is_authenticated());
    assert!(!store.storage().exists());
}
