use serde::{Deserialize, Serialize};

use crate::config::{BackendConfig, GateSettings, RouteConfig};

/// Feature flags controlling which optional integrations are active.
///
/// Loaded from `config.toml` at startup. Every field defaults to `false` so
/// that a missing or incomplete config file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub telemetry: bool,
    #[serde(default)]
    pub lead_finder: bool,
    #[serde(default)]
    pub email_sequencer: bool,
    #[serde(default)]
    pub outreach_tracker: bool,
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub routes: RouteConfig,
    #[serde(default)]
    pub gate: GateSettings,
}
