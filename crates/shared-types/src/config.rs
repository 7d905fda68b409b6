use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::UserRole;

// ---------------------------------------------------------------------------
// Backend connection
// ---------------------------------------------------------------------------

/// Connection settings for the hosted backend (auth, REST tables, functions).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            request_timeout_ms: 10_000,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Where each role lands when it reaches a page reserved for another role.
///
/// Keys are lowercase role names. The lookup is total: any role without an
/// entry, and a missing role, goes to `default`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleHomes {
    #[serde(default = "default_home")]
    pub default: String,
    #[serde(flatten)]
    pub roles: BTreeMap<String, String>,
}

fn default_home() -> String {
    "/dashboard".to_string()
}

impl Default for RoleHomes {
    fn default() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert("attorney".to_string(), "/attorney-dashboard".to_string());
        roles.insert("client".to_string(), "/client-dashboard".to_string());
        Self {
            default: default_home(),
            roles,
        }
    }
}

impl RoleHomes {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            roles: BTreeMap::new(),
        }
    }

    pub fn with_role(mut self, role: &UserRole, route: impl Into<String>) -> Self {
        self.roles.insert(role.as_str().to_string(), route.into());
        self
    }

    pub fn home_for(&self, role: Option<&UserRole>) -> &str {
        role.and_then(|r| self.roles.get(r.as_str()))
            .map(String::as_str)
            .unwrap_or(self.default.as_str())
    }
}

/// Route names the gate redirects to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteConfig {
    #[serde(default = "default_login")]
    pub login: String,
    #[serde(default)]
    pub role_homes: RoleHomes,
}

fn default_login() -> String {
    "/login".to_string()
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            role_homes: RoleHomes::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Tuning for the authorization gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateSettings {
    /// Upper bound on a single role lookup (and the initial session fetch).
    pub role_lookup_timeout_ms: u64,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            role_lookup_timeout_ms: 5_000,
        }
    }
}

impl GateSettings {
    pub fn role_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.role_lookup_timeout_ms)
    }
}
