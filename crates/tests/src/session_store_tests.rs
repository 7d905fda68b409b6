use backend::{BackendClient, RemoteSessionStore};
use gate::{SessionListener, SessionProvider};
use pretty_assertions::assert_eq;
use shared_types::{AppErrorKind, Session};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::common::FakeBackend;

fn recorder() -> (SessionListener, Arc<Mutex<Vec<Session>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let listener: SessionListener = Arc::new(move |s| sink.lock().unwrap().push(s));
    (listener, seen)
}

async fn store_with_account() -> (FakeBackend, RemoteSessionStore) {
    let fake = FakeBackend::start().await;
    fake.add_account("ana@example.com", "correct horse", "user-ana");
    let client = BackendClient::new(fake.backend_config()).unwrap();
    (fake, RemoteSessionStore::new(client))
}

#[tokio::test]
async fn sign_in_notifies_and_session_is_present() {
    let (_fake, store) = store_with_account().await;
    let (listener, seen) = recorder();
    let _sub = store.on_session_change(listener);

    assert_eq!(store.current_session().await.unwrap(), Session::absent());

    let session = store
        .sign_in_with_password("ana@example.com", "correct horse")
        .await
        .unwrap();
    assert_eq!(session, Session::present("user-ana"));
    assert_eq!(*seen.lock().unwrap(), vec![Session::present("user-ana")]);
    assert_eq!(store.current_session().await.unwrap(), Session::present("user-ana"));
    assert!(store.access_token().is_some());
}

#[tokio::test]
async fn wrong_password_is_rejected_without_notifying() {
    let (_fake, store) = store_with_account().await;
    let (listener, seen) = recorder();
    let _sub = store.on_session_change(listener);

    let err = store
        .sign_in_with_password("ana@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::BadRequest);
    assert_eq!(err.message, "Invalid login credentials");
    assert!(seen.lock().unwrap().is_empty());
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn expired_access_token_ends_the_session() {
    let (fake, store) = store_with_account().await;
    store
        .sign_in_with_password("ana@example.com", "correct horse")
        .await
        .unwrap();
    let (listener, seen) = recorder();
    let _sub = store.on_session_change(listener);

    fake.expire_access_tokens();
    assert_eq!(store.current_session().await.unwrap(), Session::absent());
    assert_eq!(*seen.lock().unwrap(), vec![Session::absent()]);
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn stale_expiry_check_keeps_a_newer_sign_in() {
    let (fake, store) = store_with_account().await;
    fake.add_account("ben@example.com", "hunter2", "user-ben");
    let store = Arc::new(store);
    store
        .sign_in_with_password("ana@example.com", "correct horse")
        .await
        .unwrap();
    let (listener, seen) = recorder();
    let _sub = store.on_session_change(listener);

    // Ana's token is rejected, but only after Ben has signed in.
    fake.expire_access_tokens();
    fake.slow_user_lookup(Duration::from_millis(300));
    let check = tokio::spawn({
        let store = store.clone();
        async move { store.current_session().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    store
        .sign_in_with_password("ben@example.com", "hunter2")
        .await
        .unwrap();
    let ben_token = store.access_token();
    assert!(ben_token.is_some());

    let checked = check.await.unwrap().unwrap();
    assert_eq!(checked, Session::present("user-ben"));
    assert_eq!(store.access_token(), ben_token);
    assert_eq!(store.user_id().as_deref(), Some("user-ben"));
    assert_eq!(*seen.lock().unwrap(), vec![Session::present("user-ben")]);
}

#[tokio::test]
async fn refresh_rotates_tokens_for_the_same_user() {
    let (_fake, store) = store_with_account().await;
    store
        .sign_in_with_password("ana@example.com", "correct horse")
        .await
        .unwrap();
    let before = store.access_token().unwrap();

    let session = store.refresh().await.unwrap();
    assert_eq!(session, Session::present("user-ana"));
    let after = store.access_token().unwrap();
    assert_ne!(before, after);
    assert_eq!(store.current_session().await.unwrap(), Session::present("user-ana"));
}

#[tokio::test]
async fn revoked_refresh_token_ends_the_session() {
    let (fake, store) = store_with_account().await;
    store
        .sign_in_with_password("ana@example.com", "correct horse")
        .await
        .unwrap();
    let (listener, seen) = recorder();
    let _sub = store.on_session_change(listener);

    fake.revoke_refresh_tokens();
    let err = store.refresh().await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::BadRequest);
    assert!(store.access_token().is_none());
    assert_eq!(*seen.lock().unwrap(), vec![Session::absent()]);
}

#[tokio::test]
async fn refresh_without_session_is_unauthorized() {
    let (_fake, store) = store_with_account().await;
    let err = store.refresh().await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Unauthorized);
}

#[tokio::test]
async fn sign_out_notifies_and_logs_out_remotely() {
    let (fake, store) = store_with_account().await;
    store
        .sign_in_with_password("ana@example.com", "correct horse")
        .await
        .unwrap();
    let (listener, seen) = recorder();
    let _sub = store.on_session_change(listener);

    store.sign_out().await;
    assert_eq!(*seen.lock().unwrap(), vec![Session::absent()]);
    assert_eq!(fake.logouts(), 1);
    assert_eq!(store.current_session().await.unwrap(), Session::absent());

    // Signing out again has nothing to end.
    store.sign_out().await;
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(fake.logouts(), 1);
}

#[tokio::test]
async fn wrong_api_key_is_unauthorized() {
    let fake = FakeBackend::start().await;
    fake.add_account("ana@example.com", "correct horse", "user-ana");
    let mut config = fake.backend_config();
    config.anon_key = "not-the-key".to_string();
    let store = RemoteSessionStore::new(BackendClient::new(config).unwrap());

    let err = store
        .sign_in_with_password("ana@example.com", "correct horse")
        .await
        .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Unauthorized);
    assert_eq!(err.message, "No API key found");
}

#[tokio::test]
async fn dropped_subscription_stops_delivery() {
    let (_fake, store) = store_with_account().await;
    let (listener, seen) = recorder();
    let sub = store.on_session_change(listener);
    assert_eq!(store.listener_count(), 1);

    drop(sub);
    assert_eq!(store.listener_count(), 0);
    store
        .sign_in_with_password("ana@example.com", "correct horse")
        .await
        .unwrap();
    assert!(seen.lock().unwrap().is_empty());
}
