use async_trait::async_trait;
use gate::{SessionListener, SessionListeners, SessionProvider, Subscription};
use serde_json::json;
use shared_types::{AppError, AppErrorKind, Session};
use std::sync::{Mutex, MutexGuard};

use crate::client::{BackendClient, TokenGrant};

#[derive(Debug, Clone)]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
    user_id: String,
}

/// Session held against the hosted auth service.
///
/// Sign-in, refresh and sign-out each push the resulting session to every
/// listener. An access token the auth service no longer accepts ends the
/// session the same way a sign-out does.
pub struct RemoteSessionStore {
    client: BackendClient,
    tokens: Mutex<Option<StoredTokens>>,
    listeners: SessionListeners,
}

impl RemoteSessionStore {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            tokens: Mutex::new(None),
            listeners: SessionListeners::new(),
        }
    }

    fn tokens(&self) -> MutexGuard<'_, Option<StoredTokens>> {
        self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The access token of the current session, for authenticated table and
    /// function calls.
    pub fn access_token(&self) -> Option<String> {
        self.tokens().as_ref().map(|t| t.access_token.clone())
    }

    /// The user the held tokens belong to.
    pub fn user_id(&self) -> Option<String> {
        self.tokens().as_ref().map(|t| t.user_id.clone())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn store_grant(&self, grant: TokenGrant) -> Session {
        let session = Session::present(grant.user.id.clone());
        *self.tokens() = Some(StoredTokens {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            user_id: grant.user.id,
        });
        self.listeners.notify(&session);
        session
    }

    fn end_session(&self) {
        self.end_session_if(|_| true);
    }

    /// Clear the held tokens only while `still_held` accepts them. Tokens
    /// stored by a sign-in that landed after the check started stay put.
    fn end_session_if(&self, still_held: impl FnOnce(&StoredTokens) -> bool) -> bool {
        let ended = {
            let mut tokens = self.tokens();
            let matches = tokens.as_ref().map_or(false, still_held);
            if matches {
                *tokens = None;
            }
            matches
        };
        if ended {
            self.listeners.notify(&Session::absent());
        }
        ended
    }

    fn held_session(&self) -> Session {
        match self.user_id() {
            Some(user_id) => Session::present(user_id),
            None => Session::absent(),
        }
    }

    /// End the session `checked` belonged to. When a newer sign-in replaced
    /// it during the check, that session is reported instead.
    fn end_checked_session(&self, checked: &StoredTokens) -> Session {
        if self.end_session_if(|held| held.access_token == checked.access_token) {
            Session::absent()
        } else {
            tracing::debug!(user_id = %checked.user_id, "Session replaced during check, keeping it");
            self.held_session()
        }
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let grant = self
            .client
            .token_grant("password", &json!({ "email": email, "password": password }))
            .await?;
        tracing::info!(user_id = %grant.user.id, "Signed in");
        Ok(self.store_grant(grant))
    }

    /// Exchange the refresh token for a new token pair. A rejected refresh
    /// token ends the session.
    pub async fn refresh(&self) -> Result<Session, AppError> {
        let Some(refresh_token) = self.tokens().as_ref().map(|t| t.refresh_token.clone()) else {
            return Err(AppError::unauthorized("No session to refresh"));
        };

        match self
            .client
            .token_grant("refresh_token", &json!({ "refresh_token": refresh_token }))
            .await
        {
            Ok(grant) => {
                tracing::debug!(user_id = %grant.user.id, "Session refreshed");
                Ok(self.store_grant(grant))
            }
            Err(e) => {
                if matches!(e.kind, AppErrorKind::Unauthorized | AppErrorKind::BadRequest) {
                    tracing::info!(error = %e, "Refresh token rejected, ending session");
                    self.end_session_if(|held| held.refresh_token == refresh_token);
                }
                Err(e)
            }
        }
    }

    /// End the session locally and tell the auth service. A failed remote
    /// logout is logged; the local session ends regardless.
    pub async fn sign_out(&self) {
        let access_token = self.access_token();
        self.end_session();
        if let Some(token) = access_token {
            if let Err(e) = self.client.logout(&token).await {
                tracing::warn!(error = %e, "Remote logout failed");
            }
        }
    }
}

#[async_trait]
impl SessionProvider for RemoteSessionStore {
    async fn current_session(&self) -> Result<Session, AppError> {
        let Some(held) = self.tokens().clone() else {
            return Ok(Session::absent());
        };

        match self.client.auth_user(&held.access_token).await {
            Ok(user) if user.id == held.user_id => Ok(Session::present(user.id)),
            Ok(user) => {
                tracing::warn!(
                    held = %held.user_id,
                    reported = %user.id,
                    "Auth service reported a different user, ending session"
                );
                Ok(self.end_checked_session(&held))
            }
            Err(e) if e.kind == AppErrorKind::Unauthorized => {
                tracing::info!("Access token expired, ending session");
                Ok(self.end_checked_session(&held))
            }
            Err(e) => Err(e),
        }
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}
