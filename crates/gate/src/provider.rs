use async_trait::async_trait;
use shared_types::{AppError, RoleRecord, Session};
use std::sync::{Arc, Mutex, Weak};

/// Callback invoked with the new session on every login, logout or refresh.
pub type SessionListener = Arc<dyn Fn(Session) + Send + Sync>;

/// Source of the current authentication session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// One-shot read of the session as it stands now.
    async fn current_session(&self) -> Result<Session, AppError>;

    /// Register `listener` for session changes until the returned
    /// subscription is cancelled or dropped.
    fn on_session_change(&self, listener: SessionListener) -> Subscription;
}

/// Looks up the single role record for a user, if any.
#[async_trait]
pub trait RoleResolver: Send + Sync {
    async fn resolve_role(&self, user_id: &str) -> Result<Option<RoleRecord>, AppError>;
}

/// Handle to a session-change registration.
///
/// `unsubscribe` runs the cancel hook at most once; dropping the handle
/// unsubscribes as well.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(u64, SessionListener)>,
}

/// Listener registry for `SessionProvider` implementations.
#[derive(Clone, Default)]
pub struct SessionListeners {
    table: Arc<Mutex<ListenerTable>>,
}

impl SessionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: SessionListener) -> Subscription {
        let id = {
            let mut table = lock(&self.table);
            let id = table.next_id;
            table.next_id += 1;
            table.entries.push((id, listener));
            id
        };

        let table: Weak<Mutex<ListenerTable>> = Arc::downgrade(&self.table);
        Subscription::new(move || {
            if let Some(table) = table.upgrade() {
                lock(&table).entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Deliver `session` to every registered listener. Listeners run outside
    /// the registry lock so they may subscribe or unsubscribe freely.
    pub fn notify(&self, session: &Session) {
        let listeners: Vec<SessionListener> = lock(&self.table)
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(session.clone());
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.table).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
