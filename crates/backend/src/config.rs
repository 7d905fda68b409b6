use shared_types::{AppConfig, AppError};
use std::path::Path;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "config.toml";

/// Environment variables that override values from `config.toml`.
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const BACKEND_ANON_KEY_ENV: &str = "BACKEND_ANON_KEY";

pub fn parse_config(contents: &str) -> Result<AppConfig, AppError> {
    toml::from_str(contents)
        .map_err(|e| AppError::bad_request(format!("Invalid {CONFIG_PATH}: {e}")))
}

/// Apply environment overrides. Blank values are ignored.
pub fn apply_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(url) = non_blank(BACKEND_URL_ENV) {
        config.backend.url = url;
    }
    if let Some(key) = non_blank(BACKEND_ANON_KEY_ENV) {
        config.backend.anon_key = key;
    }
}

/// Read and parse a config file, then apply environment overrides.
///
/// A missing or unparseable file falls back to defaults so that startup never
/// fails on configuration alone.
pub fn load_config_from(path: impl AsRef<Path>) -> AppConfig {
    let _ = dotenvy::dotenv();
    let path = path.as_ref();

    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents).unwrap_or_else(|e| {
            eprintln!("[config] {e}, using defaults");
            AppConfig::default()
        }),
        Err(e) => {
            eprintln!("[config] {} not found ({e}), using defaults", path.display());
            AppConfig::default()
        }
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    eprintln!("[config] Feature flags: {:?}", config.features);
    config
}

/// Load `config.toml` once for the process. Later calls return the first
/// result.
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| load_config_from(CONFIG_PATH))
}

/// The loaded config, or defaults if `load_config()` has not run yet.
pub fn config() -> &'static AppConfig {
    static DEFAULT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(AppConfig::default))
}
