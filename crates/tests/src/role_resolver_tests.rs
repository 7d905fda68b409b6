use backend::{BackendClient, RemoteRoleResolver};
use gate::{has_role, RoleResolver};
use pretty_assertions::assert_eq;
use shared_types::{AppErrorKind, GateState, RoleRecord, UserRole};

use crate::common::FakeBackend;

fn resolver(fake: &FakeBackend) -> RemoteRoleResolver {
    RemoteRoleResolver::new(BackendClient::new(fake.backend_config()).unwrap())
}

#[tokio::test]
async fn resolves_the_users_role() {
    let fake = FakeBackend::start().await;
    fake.add_role("u1", "admin").add_role("u2", "client");

    let record = resolver(&fake).resolve_role("u1").await.unwrap();
    assert_eq!(record, Some(RoleRecord::new("u1", UserRole::Admin)));
}

#[tokio::test]
async fn missing_row_is_no_role() {
    let fake = FakeBackend::start().await;
    fake.add_role("u2", "client");

    assert_eq!(resolver(&fake).resolve_role("u1").await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_rows_are_a_conflict() {
    let fake = FakeBackend::start().await;
    fake.add_role("u1", "admin").add_role("u1", "user");

    let err = resolver(&fake).resolve_role("u1").await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Conflict);
}

#[tokio::test]
async fn unrecognised_role_names_are_kept() {
    let fake = FakeBackend::start().await;
    fake.add_role("u1", "Paralegal");

    let record = resolver(&fake).resolve_role("u1").await.unwrap();
    assert_eq!(
        record.map(|r| r.role),
        Some(UserRole::Unknown("paralegal".to_string()))
    );
}

#[tokio::test]
async fn has_role_treats_errors_as_false() {
    let fake = FakeBackend::start().await;
    fake.add_role("u1", "admin").add_role("u3", "admin").add_role("u3", "user");
    let resolver = resolver(&fake);

    assert!(has_role(&resolver, "u1", &UserRole::Admin).await);
    assert!(!has_role(&resolver, "u1", &UserRole::Client).await);
    assert!(!has_role(&resolver, "u3", &UserRole::Admin).await);
}

// --- Gate over the live adapters ---

#[tokio::test]
async fn gate_follows_sign_in_and_sign_out() {
    let fake = FakeBackend::start().await;
    fake.add_account("root@example.com", "s3cret", "admin-1")
        .add_role("admin-1", "admin");
    let config = fake.app_config();
    let services = fake.services();

    let gate = services.mount_gate(&config, Some(UserRole::Admin)).unwrap();
    assert_eq!(gate.settled().await.state, GateState::RedirectToLogin);

    services
        .sessions
        .sign_in_with_password("root@example.com", "s3cret")
        .await
        .unwrap();
    assert_eq!(gate.settled().await.state, GateState::AuthorizedWithRole);

    services.sessions.sign_out().await;
    assert_eq!(gate.decision().state, GateState::RedirectToLogin);

    gate.teardown();
    assert_eq!(services.sessions.listener_count(), 0);
}

#[tokio::test]
async fn gate_sends_clients_to_their_dashboard() {
    let fake = FakeBackend::start().await;
    fake.add_account("cy@example.com", "pw", "client-1")
        .add_role("client-1", "client");
    let config = fake.app_config();
    let services = fake.services();
    services
        .sessions
        .sign_in_with_password("cy@example.com", "pw")
        .await
        .unwrap();

    let gate = services.mount_gate(&config, Some(UserRole::Admin)).unwrap();
    let decision = gate.settled().await;
    assert_eq!(decision.state, GateState::RedirectToRoleHome);
    assert_eq!(decision.target_role_home.as_deref(), Some("/client-dashboard"));
}
