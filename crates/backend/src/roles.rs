use async_trait::async_trait;
use gate::RoleResolver;
use shared_types::{AppError, RoleRecord, UserRoleRow};
use std::sync::Arc;

use crate::client::{eq_filter, BackendClient};
use crate::session::RemoteSessionStore;

/// Role lookup against the `user_roles` table.
///
/// Requests carry the signed-in user's token when a session store is
/// attached, so row-level policies apply; otherwise the anon key is used.
pub struct RemoteRoleResolver {
    client: BackendClient,
    sessions: Option<Arc<RemoteSessionStore>>,
}

impl RemoteRoleResolver {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            sessions: None,
        }
    }

    pub fn with_sessions(mut self, sessions: Arc<RemoteSessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }
}

#[async_trait]
impl RoleResolver for RemoteRoleResolver {
    async fn resolve_role(&self, user_id: &str) -> Result<Option<RoleRecord>, AppError> {
        let token = self.sessions.as_ref().and_then(|s| s.access_token());
        let mut rows: Vec<UserRoleRow> = self
            .client
            .rest_get(
                "user_roles",
                &[
                    ("select", "user_id,role".to_string()),
                    eq_filter("user_id", user_id),
                ],
                token.as_deref(),
            )
            .await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop().map(RoleRecord::from)),
            n => Err(AppError::conflict(format!(
                "Expected at most one role for user {user_id}, found {n}"
            ))),
        }
    }
}
