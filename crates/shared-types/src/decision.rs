use serde::{Deserialize, Serialize};

use crate::models::{RoleRecord, UserRole};

/// Where an authorization decision stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    /// Session or role lookup still outstanding.
    Loading,
    /// The gate was torn down; nothing behind it may render.
    Denied,
    AuthorizedNoRoleRequired,
    AuthorizedWithRole,
    RedirectToLogin,
    RedirectToRoleHome,
}

impl GateState {
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            GateState::AuthorizedNoRoleRequired | GateState::AuthorizedWithRole
        )
    }
}

/// Progress of the role lookup for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleLookup {
    /// No lookup has been issued (no session yet, or the session is absent).
    #[default]
    Idle,
    Pending,
    /// The lookup finished. `None` covers both "no record" and a failed lookup.
    Settled(Option<RoleRecord>),
}

/// The gate's output for one set of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    pub state: GateState,
    /// Set only for `RedirectToRoleHome`.
    pub target_role_home: Option<String>,
    /// The role the lookup produced, kept for callers even when the route
    /// required none (e.g. to show an admin-only link).
    pub resolved_role: Option<UserRole>,
}

impl AuthorizationDecision {
    fn bare(state: GateState) -> Self {
        Self {
            state,
            target_role_home: None,
            resolved_role: None,
        }
    }

    pub fn loading() -> Self {
        Self::bare(GateState::Loading)
    }

    pub fn denied() -> Self {
        Self::bare(GateState::Denied)
    }

    pub fn redirect_to_login() -> Self {
        Self::bare(GateState::RedirectToLogin)
    }

    pub fn authorized_no_role_required(resolved_role: Option<UserRole>) -> Self {
        Self {
            resolved_role,
            ..Self::bare(GateState::AuthorizedNoRoleRequired)
        }
    }

    pub fn authorized_with_role(role: UserRole) -> Self {
        Self {
            resolved_role: Some(role),
            ..Self::bare(GateState::AuthorizedWithRole)
        }
    }

    pub fn redirect_to_role_home(target: impl Into<String>, resolved_role: Option<UserRole>) -> Self {
        Self {
            state: GateState::RedirectToRoleHome,
            target_role_home: Some(target.into()),
            resolved_role,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == GateState::Loading
    }

    /// Translate the decision into what the navigation layer should do for a
    /// request to `requested_path`.
    pub fn navigation(&self, requested_path: &str, login_route: &str) -> Navigation {
        match self.state {
            GateState::Loading => Navigation::RenderLoading,
            GateState::AuthorizedNoRoleRequired | GateState::AuthorizedWithRole => {
                Navigation::RenderChildren
            }
            GateState::RedirectToLogin => Navigation::Redirect {
                to: login_route.to_string(),
                from: Some(requested_path.to_string()),
            },
            GateState::RedirectToRoleHome => Navigation::Redirect {
                to: self
                    .target_role_home
                    .clone()
                    .unwrap_or_else(|| login_route.to_string()),
                from: None,
            },
            GateState::Denied => Navigation::Redirect {
                to: login_route.to_string(),
                from: None,
            },
        }
    }
}

/// Instruction handed to the navigation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    RenderChildren,
    RenderLoading,
    /// Replace the current location with `to`. When `from` is set the
    /// original location is preserved so a post-login flow can return to it.
    Redirect { to: String, from: Option<String> },
}

impl Navigation {
    /// The redirect target as a URL, carrying `from` as the `redirect` query
    /// parameter. `None` when nothing should be redirected.
    pub fn href(&self) -> Option<String> {
        match self {
            Navigation::Redirect { to, from: Some(from) } => {
                let sep = if to.contains('?') { '&' } else { '?' };
                Some(format!("{to}{sep}redirect={}", urlencoding::encode(from)))
            }
            Navigation::Redirect { to, from: None } => Some(to.clone()),
            _ => None,
        }
    }
}
