//! In-memory collaborators for exercising the gate without a backend.

use async_trait::async_trait;
use shared_types::{AppError, RoleRecord, Session, UserRole};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::provider::{RoleResolver, SessionListener, SessionListeners, SessionProvider, Subscription};

/// Session provider whose session is set directly by the test.
pub struct InMemorySessionProvider {
    current: Mutex<Session>,
    listeners: SessionListeners,
    fetch_delay: Option<Duration>,
    fail_fetch: AtomicBool,
}

impl InMemorySessionProvider {
    pub fn new(initial: Session) -> Self {
        Self {
            current: Mutex::new(initial),
            listeners: SessionListeners::new(),
            fetch_delay: None,
            fail_fetch: AtomicBool::new(false),
        }
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Make `current_session` return an error from now on.
    pub fn fail_fetches(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    /// Replace the session and notify every listener, as a login, logout or
    /// token refresh would.
    pub fn set_session(&self, session: Session) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = session.clone();
        self.listeners.notify(&session);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[async_trait]
impl SessionProvider for InMemorySessionProvider {
    /// Answers with the session held when the call started, even if a delay
    /// lets a later `set_session` land first.
    async fn current_session(&self) -> Result<Session, AppError> {
        let snapshot = self.current.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::upstream("session store unavailable"));
        }
        Ok(snapshot)
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Role(UserRole),
    Fail,
    Hang,
}

#[derive(Debug, Clone)]
struct Script {
    outcome: Outcome,
    delay: Option<Duration>,
}

/// Role resolver answering from a per-user script. Users without a script
/// have no role record.
#[derive(Default)]
pub struct ScriptedRoleResolver {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRoleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(self, user_id: &str, outcome: Outcome, delay: Option<Duration>) -> Self {
        self.scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id.to_string(), Script { outcome, delay });
        self
    }

    pub fn with_role(self, user_id: &str, role: UserRole) -> Self {
        self.script(user_id, Outcome::Role(role), None)
    }

    pub fn with_role_after(self, user_id: &str, role: UserRole, delay: Duration) -> Self {
        self.script(user_id, Outcome::Role(role), Some(delay))
    }

    pub fn with_failure(self, user_id: &str) -> Self {
        self.script(user_id, Outcome::Fail, None)
    }

    /// The lookup for `user_id` never completes.
    pub fn hanging(self, user_id: &str) -> Self {
        self.script(user_id, Outcome::Hang, None)
    }

    /// User ids looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl RoleResolver for ScriptedRoleResolver {
    async fn resolve_role(&self, user_id: &str) -> Result<Option<RoleRecord>, AppError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(user_id.to_string());

        let script = self
            .scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(user_id)
            .cloned();
        let Some(script) = script else {
            return Ok(None);
        };

        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }
        match script.outcome {
            Outcome::Role(role) => Ok(Some(RoleRecord::new(user_id, role))),
            Outcome::Fail => Err(AppError::upstream("role lookup failed")),
            Outcome::Hang => std::future::pending().await,
        }
    }
}
