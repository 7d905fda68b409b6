use gate::{AuthGate, GateOptions};
use shared_types::{AppConfig, AppError, UserRole};
use std::sync::Arc;

use crate::admin::AdminConsole;
use crate::client::BackendClient;
use crate::roles::RemoteRoleResolver;
use crate::session::RemoteSessionStore;

/// The backend adapters wired together from one config.
///
/// The session store is shared: the role resolver reads its access token and
/// every mounted gate subscribes to its session events.
#[derive(Clone)]
pub struct Services {
    pub client: BackendClient,
    pub sessions: Arc<RemoteSessionStore>,
    pub roles: Arc<RemoteRoleResolver>,
}

impl Services {
    pub fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let client = BackendClient::new(config.backend.clone())?;
        let sessions = Arc::new(RemoteSessionStore::new(client.clone()));
        let roles =
            Arc::new(RemoteRoleResolver::new(client.clone()).with_sessions(sessions.clone()));
        tracing::info!(url = config.backend.base_url(), "Backend services ready");
        Ok(Self {
            client,
            sessions,
            roles,
        })
    }

    /// Mount a gate for a view, optionally restricted to one role. Fails
    /// outside a tokio runtime.
    pub fn mount_gate(
        &self,
        config: &AppConfig,
        required_role: Option<UserRole>,
    ) -> Result<AuthGate, AppError> {
        AuthGate::mount(
            GateOptions::from_config(config, required_role),
            self.sessions.clone(),
            self.roles.clone(),
        )
    }

    pub async fn open_admin_console(&self, config: &AppConfig) -> Result<AdminConsole, AppError> {
        AdminConsole::open(
            self.client.clone(),
            self.sessions.clone(),
            self.roles.as_ref(),
            config.features.clone(),
        )
        .await
    }
}
