use gate::testing::{InMemorySessionProvider, ScriptedRoleResolver};
use gate::{AuthGate, GateOptions};
use pretty_assertions::assert_eq;
use shared_types::{AppConfig, GateState, Navigation, RoleHomes, RouteConfig, Session, UserRole};
use std::sync::Arc;

const LOGIN: &str = "/login";

#[tokio::test(start_paused = true)]
async fn authorized_admin_renders_the_view() {
    let provider = Arc::new(InMemorySessionProvider::new(Session::present("u1")));
    let resolver = Arc::new(ScriptedRoleResolver::new().with_role("u1", UserRole::Admin));
    let gate = AuthGate::mount(GateOptions::new(Some(UserRole::Admin)), provider, resolver).unwrap();

    let decision = gate.settled().await;
    assert_eq!(decision.state, GateState::AuthorizedWithRole);
    assert!(decision.state.is_authorized());
    assert_eq!(gate.navigation("/admin/emails", LOGIN), Navigation::RenderChildren);
}

#[tokio::test(start_paused = true)]
async fn logged_out_visitor_is_sent_to_login_with_return_path() {
    let provider = Arc::new(InMemorySessionProvider::new(Session::absent()));
    let resolver = Arc::new(ScriptedRoleResolver::new());
    let gate = AuthGate::mount(GateOptions::new(Some(UserRole::Admin)), provider, resolver).unwrap();

    assert_eq!(gate.settled().await.state, GateState::RedirectToLogin);
    let nav = gate.navigation("/admin/emails", LOGIN);
    assert_eq!(
        nav,
        Navigation::Redirect {
            to: LOGIN.to_string(),
            from: Some("/admin/emails".to_string()),
        }
    );
    assert_eq!(nav.href().as_deref(), Some("/login?redirect=%2Fadmin%2Femails"));
}

#[tokio::test(start_paused = true)]
async fn wrong_role_lands_on_default_dashboard() {
    let provider = Arc::new(InMemorySessionProvider::new(Session::present("u2")));
    let resolver = Arc::new(ScriptedRoleResolver::new().with_role("u2", UserRole::User));
    let gate = AuthGate::mount(GateOptions::new(Some(UserRole::Admin)), provider, resolver).unwrap();

    let decision = gate.settled().await;
    assert_eq!(decision.state, GateState::RedirectToRoleHome);
    assert_eq!(decision.target_role_home.as_deref(), Some("/dashboard"));
    assert_eq!(decision.resolved_role, Some(UserRole::User));
    assert_eq!(
        gate.navigation("/admin/emails", LOGIN).href().as_deref(),
        Some("/dashboard")
    );
}

#[tokio::test(start_paused = true)]
async fn loading_renders_placeholder() {
    let provider = Arc::new(InMemorySessionProvider::new(Session::present("u1")));
    let resolver = Arc::new(ScriptedRoleResolver::new().hanging("u1"));
    let gate = AuthGate::mount(GateOptions::new(Some(UserRole::Admin)), provider, resolver).unwrap();

    assert_eq!(gate.navigation("/admin", LOGIN), Navigation::RenderLoading);
    assert_eq!(gate.navigation("/admin", LOGIN).href(), None);
}

#[tokio::test(start_paused = true)]
async fn role_homes_come_from_config() {
    let config = AppConfig {
        routes: RouteConfig {
            login: "/sign-in".to_string(),
            role_homes: RoleHomes::new("/home").with_role(&UserRole::Client, "/my-cases"),
        },
        ..AppConfig::default()
    };
    let provider = Arc::new(InMemorySessionProvider::new(Session::present("c1")));
    let resolver = Arc::new(ScriptedRoleResolver::new().with_role("c1", UserRole::Client));
    let gate = AuthGate::mount(
        GateOptions::from_config(&config, Some(UserRole::Attorney)),
        provider,
        resolver,
    )
    .unwrap();

    let decision = gate.settled().await;
    assert_eq!(decision.target_role_home.as_deref(), Some("/my-cases"));
    assert_eq!(
        gate.navigation("/attorney-dashboard", &config.routes.login),
        Navigation::Redirect {
            to: "/my-cases".to_string(),
            from: None,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn evaluate_reuses_resolved_role_for_other_requirements() {
    let provider = Arc::new(InMemorySessionProvider::new(Session::present("a1")));
    let resolver = Arc::new(ScriptedRoleResolver::new().with_role("a1", UserRole::Attorney));
    let gate = AuthGate::mount(
        GateOptions::new(Some(UserRole::Attorney)),
        provider,
        resolver.clone(),
    )
    .unwrap();
    gate.settled().await;

    assert_eq!(
        gate.evaluate(Some(&UserRole::Admin)).target_role_home.as_deref(),
        Some("/attorney-dashboard")
    );
    assert_eq!(
        gate.evaluate(None).state,
        GateState::AuthorizedNoRoleRequired
    );
    assert_eq!(resolver.calls().len(), 1);
}
