// Standard library
use std::path::PathBuf;
use std::sync::Arc;

// 3rd party crates
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Check {
    /// Seconds allowed for one dial or request.
    #[serde(default = "default_check_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Resolver {
    #[serde(default = "default_resolver_enabled")]
    pub enabled: bool,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Seconds between two failed lookups.
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    #[serde(default = "default_server_address")]
    pub address: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub force_success: bool,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Notification {
    #[serde(default)]
    pub slack_webhook_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub log: Log,
    pub check: Check,
    pub resolver: Resolver,
    pub server: Server,
    pub notification: Notification,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_check_timeout() -> u64 {
    30
}

fn default_resolver_enabled() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    3
}

fn default_server_address() -> String {
    "0.0.0.0:8000".to_string()
}

/// Settings that passed validation. Only this type is handed to the rest of
/// the program.
#[derive(Debug, Clone)]
pub struct ValidatedSettings(pub(super) Settings);

/// Loads the settings once at startup and shares them read-only.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub settings: Arc<ValidatedSettings>,
    pub config_path: Option<PathBuf>,
}
