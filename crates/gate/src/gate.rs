use shared_types::{
    AppConfig, AppError, AuthorizationDecision, Navigation, RoleHomes, RoleLookup, RoleRecord, Session,
    UserRole,
};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::evaluate::evaluate;
use crate::provider::{RoleResolver, SessionListener, SessionProvider, Subscription};

/// Settings for one protected view.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOptions {
    pub required_role: Option<UserRole>,
    pub role_homes: RoleHomes,
    /// Bound on the initial session fetch and on each role lookup. Past it
    /// the call is treated as failed.
    pub role_lookup_timeout: Duration,
}

impl GateOptions {
    pub fn new(required_role: Option<UserRole>) -> Self {
        Self {
            required_role,
            role_homes: RoleHomes::default(),
            role_lookup_timeout: Duration::from_secs(5),
        }
    }

    pub fn from_config(config: &AppConfig, required_role: Option<UserRole>) -> Self {
        Self {
            required_role,
            role_homes: config.routes.role_homes.clone(),
            role_lookup_timeout: config.gate.role_lookup_timeout(),
        }
    }

    pub fn with_role_homes(mut self, role_homes: RoleHomes) -> Self {
        self.role_homes = role_homes;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.role_lookup_timeout = timeout;
        self
    }
}

/// Access-control gate for a protected view.
///
/// Mounting subscribes to session changes and fetches the current session
/// once. Every session event re-runs the decision; a role lookup is issued
/// whenever the signed-in user changes. Lookups carry a generation number
/// and a result is applied only while its generation is still current, so
/// decisions follow event order rather than completion order.
///
/// Mounting outside a tokio runtime is an error. Dropping the gate tears it
/// down.
pub struct AuthGate {
    shared: Arc<Shared>,
}

struct Shared {
    options: GateOptions,
    resolver: Arc<dyn RoleResolver>,
    runtime: Handle,
    decision_tx: watch::Sender<AuthorizationDecision>,
    core: Mutex<Core>,
}

#[derive(Default)]
struct Core {
    mounted: bool,
    /// Bumped whenever an in-flight lookup must stop counting.
    generation: u64,
    session_events: u64,
    session: Option<Session>,
    role: RoleLookup,
    subscription: Option<Subscription>,
    initial_fetch: Option<JoinHandle<()>>,
    lookup_task: Option<JoinHandle<()>>,
}

impl AuthGate {
    pub fn mount(
        options: GateOptions,
        provider: Arc<dyn SessionProvider>,
        resolver: Arc<dyn RoleResolver>,
    ) -> Result<Self, AppError> {
        let runtime = Handle::try_current().map_err(|e| {
            AppError::internal(format!("Authorization gate needs a tokio runtime: {e}"))
        })?;
        let (decision_tx, _) = watch::channel(AuthorizationDecision::loading());
        let shared = Arc::new(Shared {
            options,
            resolver,
            runtime,
            decision_tx,
            core: Mutex::new(Core {
                mounted: true,
                ..Core::default()
            }),
        });

        let listener_target = Arc::downgrade(&shared);
        let listener: SessionListener = Arc::new(move |session| {
            if let Some(shared) = listener_target.upgrade() {
                shared.on_session_event(session);
            }
        });
        let subscription = provider.on_session_change(listener);
        shared.lock().subscription = Some(subscription);

        let fetch = shared.spawn_initial_fetch(provider);
        shared.lock().initial_fetch = Some(fetch);

        tracing::debug!(
            required_role = ?shared.options.required_role,
            "Authorization gate mounted"
        );
        Ok(Self { shared })
    }

    /// Latest published decision.
    pub fn decision(&self) -> AuthorizationDecision {
        self.shared.decision_tx.borrow().clone()
    }

    /// Receiver notified on every decision change.
    pub fn subscribe(&self) -> watch::Receiver<AuthorizationDecision> {
        self.shared.decision_tx.subscribe()
    }

    /// Wait until the decision leaves `Loading`.
    pub async fn settled(&self) -> AuthorizationDecision {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|d| !d.is_loading()).await.map(|d| (*d).clone());
        settled.unwrap_or_else(|_| AuthorizationDecision::denied())
    }

    /// Decide for `required` against the current session and role, without
    /// changing what the gate publishes.
    pub fn evaluate(&self, required: Option<&UserRole>) -> AuthorizationDecision {
        let core = self.shared.lock();
        if !core.mounted {
            return AuthorizationDecision::denied();
        }
        evaluate(
            core.session.as_ref(),
            &core.role,
            required,
            &self.shared.options.role_homes,
        )
    }

    pub fn navigation(&self, requested_path: &str, login_route: &str) -> Navigation {
        self.decision().navigation(requested_path, login_route)
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.lock().mounted
    }

    /// Stop observing sessions. Unsubscribes exactly once, discards any
    /// in-flight lookup and publishes `Denied`. Later calls do nothing.
    pub fn teardown(&self) {
        let (subscription, tasks) = {
            let mut core = self.shared.lock();
            if !core.mounted {
                return;
            }
            core.mounted = false;
            core.generation += 1;
            (
                core.subscription.take(),
                [core.initial_fetch.take(), core.lookup_task.take()],
            )
        };

        if let Some(mut subscription) = subscription {
            subscription.unsubscribe();
        }
        for task in tasks.into_iter().flatten() {
            task.abort();
        }
        self.shared
            .decision_tx
            .send_replace(AuthorizationDecision::denied());
        tracing::debug!("Authorization gate torn down");
    }
}

impl Drop for AuthGate {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn spawn_initial_fetch(self: &Arc<Self>, provider: Arc<dyn SessionProvider>) -> JoinHandle<()> {
        let target: Weak<Shared> = Arc::downgrade(self);
        let timeout = self.options.role_lookup_timeout;
        self.runtime.spawn(async move {
            let session = match tokio::time::timeout(timeout, provider.current_session()).await {
                Ok(Ok(session)) => session,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Session fetch failed, treating as signed out");
                    Session::absent()
                }
                Err(_) => {
                    tracing::warn!(?timeout, "Session fetch timed out, treating as signed out");
                    Session::absent()
                }
            };
            if let Some(shared) = target.upgrade() {
                shared.on_initial_session(session);
            }
        })
    }

    fn on_initial_session(self: &Arc<Self>, session: Session) {
        let mut core = self.lock();
        if !core.mounted {
            return;
        }
        core.initial_fetch = None;
        if core.session_events > 0 {
            tracing::debug!("Initial session superseded by a session event, discarding");
            return;
        }
        self.apply_session(&mut core, session);
    }

    fn on_session_event(self: &Arc<Self>, session: Session) {
        let mut core = self.lock();
        if !core.mounted {
            return;
        }
        core.session_events += 1;
        self.apply_session(&mut core, session);
    }

    fn apply_session(self: &Arc<Self>, core: &mut Core, session: Session) {
        let previous_user = core
            .session
            .as_ref()
            .and_then(|s| s.user_id())
            .map(str::to_string);

        match session.user_id() {
            None => {
                core.generation += 1;
                if let Some(task) = core.lookup_task.take() {
                    task.abort();
                }
                core.role = RoleLookup::Idle;
            }
            Some(user_id)
                if previous_user.as_deref() == Some(user_id) && core.role != RoleLookup::Idle =>
            {
                tracing::debug!(user_id, "Session refreshed for the same user, keeping role lookup");
            }
            Some(user_id) => {
                core.generation += 1;
                if let Some(task) = core.lookup_task.take() {
                    task.abort();
                }
                core.role = RoleLookup::Pending;
                core.lookup_task = Some(self.spawn_lookup(user_id.to_string(), core.generation));
            }
        }

        core.session = Some(session);
        self.publish(core);
    }

    fn spawn_lookup(self: &Arc<Self>, user_id: String, generation: u64) -> JoinHandle<()> {
        let target: Weak<Shared> = Arc::downgrade(self);
        let resolver = self.resolver.clone();
        let timeout = self.options.role_lookup_timeout;
        tracing::debug!(%user_id, generation, "Resolving role");

        self.runtime.spawn(async move {
            let record = match tokio::time::timeout(timeout, resolver.resolve_role(&user_id)).await
            {
                Ok(Ok(record)) => record,
                Ok(Err(e)) => {
                    tracing::warn!(%user_id, error = %e, "Role lookup failed, continuing without a role");
                    None
                }
                Err(_) => {
                    tracing::warn!(%user_id, ?timeout, "Role lookup timed out, continuing without a role");
                    None
                }
            };
            if let Some(shared) = target.upgrade() {
                shared.on_role_settled(generation, record);
            }
        })
    }

    fn on_role_settled(&self, generation: u64, record: Option<RoleRecord>) {
        let mut core = self.lock();
        if !core.mounted || core.generation != generation {
            tracing::debug!(
                generation,
                current = core.generation,
                "Discarding stale role lookup"
            );
            return;
        }
        core.role = RoleLookup::Settled(record);
        core.lookup_task = None;
        self.publish(&core);
    }

    fn publish(&self, core: &Core) {
        let decision = evaluate(
            core.session.as_ref(),
            &core.role,
            self.options.required_role.as_ref(),
            &self.options.role_homes,
        );
        self.decision_tx.send_if_modified(|current| {
            if *current == decision {
                return false;
            }
            tracing::debug!(state = ?decision.state, "Authorization decision changed");
            *current = decision;
            true
        });
    }
}
