// Standard library
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use tracing::error;
use url::Url;

// Project imports
use crate::aggregator::FailurePolicy;
use crate::checker::{CheckerOptions, ResourceDescriptor, RetryPolicy};

// Current module imports
use super::constants::{
    AUTH_TOKEN_ENV, CONFIG_PATH_ENV, DEFAULT_CONFIG, ENV_PREFIX, FORCE_SUCCESS_ENV,
    RESOURCE_URLS_ENV, SLACK_WEBHOOK_URL_ENV,
};
use super::errors::ValidationError;
use super::types::{ConfigManager, Settings, ValidatedSettings};

impl Settings {
    pub fn get_log_level(&self) -> String {
        self.log.level.to_lowercase()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.check.timeout)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.resolver.max_attempts,
            delay: Duration::from_secs(self.resolver.retry_delay),
        }
    }

    /// Checker options; the nested health payload is only interpreted when
    /// `check_health_payload` is set (server mode).
    pub fn checker_options(&self, check_health_payload: bool) -> CheckerOptions {
        CheckerOptions {
            check_health_payload,
            resolve_hostnames: self.resolver.enabled,
            retry: self.retry_policy(),
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::from_force_success(self.server.force_success)
    }

    pub fn listen_address(&self) -> Result<SocketAddr, ValidationError> {
        self.server
            .address
            .parse()
            .map_err(|_| ValidationError::InvalidAddress(self.server.address.clone()))
    }

    pub fn resource_descriptors(&self) -> Result<Vec<ResourceDescriptor>, ValidationError> {
        self.server
            .resources
            .iter()
            .map(|url| {
                ResourceDescriptor::parse(url).map_err(|e| ValidationError::InvalidResource {
                    url: url.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    pub fn slack_webhook_url(&self) -> Result<Option<Url>, ValidationError> {
        let raw: &str = self.notification.slack_webhook_url.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        Url::parse(raw)
            .map(Some)
            .map_err(|e| ValidationError::InvalidWebhookUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        // Validate log level
        match self.log.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(ValidationError::InvalidLogLevel(self.log.level.clone())),
        }

        if self.check.timeout == 0 {
            return Err(ValidationError::InvalidTimeout(self.check.timeout));
        }

        if self.resolver.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts(
                self.resolver.max_attempts,
            ));
        }

        self.listen_address()?;
        self.resource_descriptors()?;
        self.slack_webhook_url()?;

        Ok(())
    }
}

impl ConfigManager {
    /// Loads and validates the settings from the built-in defaults, the
    /// optional configuration file and the given environment.
    pub fn new(env: &HashMap<String, String>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path: Option<PathBuf> = Self::get_config_path(env);
        let settings: Settings = Self::load_settings(config_path.as_deref(), env)?;

        let validated_settings = ValidatedSettings::new(settings).map_err(|e| {
            error!("Configuration validation failed: {}", e);
            e
        })?;

        Ok(ConfigManager {
            settings: Arc::new(validated_settings),
            config_path,
        })
    }

    /// Determines the configuration file path.
    fn get_config_path(env: &HashMap<String, String>) -> Option<PathBuf> {
        match env.get(CONFIG_PATH_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::config_dir().map(|dir| dir.join("resource-checker").join("config.toml")),
        }
    }

    /// Layers defaults, file, prefixed environment and legacy variables.
    pub fn load_settings(
        config_path: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<Settings, ConfigError> {
        let mut builder: ConfigBuilder<DefaultState> =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let environment: config::Map<String, String> = env
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(environment)),
        );

        let settings: Config = Self::apply_legacy_env(builder, env)?.build()?;
        settings.try_deserialize()
    }

    fn apply_legacy_env(
        builder: ConfigBuilder<DefaultState>,
        env: &HashMap<String, String>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let mut builder = builder
            .set_override_option("server.auth_token", env.get(AUTH_TOKEN_ENV).cloned())?
            .set_override_option(
                "notification.slack_webhook_url",
                env.get(SLACK_WEBHOOK_URL_ENV).cloned(),
            )?
            .set_override_option(
                "server.force_success",
                env.get(FORCE_SUCCESS_ENV).map(|value| value.trim() == "1"),
            )?;

        if let Some(raw) = env.get(RESOURCE_URLS_ENV) {
            let resources: Vec<String> = serde_json::from_str(raw).map_err(|e| {
                let msg: String = format!("{} must be a JSON array of urls: {}", RESOURCE_URLS_ENV, e);
                error!("{}", msg);
                ConfigError::Message(msg)
            })?;
            builder = builder.set_override("server.resources", resources)?;
        }

        Ok(builder)
    }

    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    pub fn get_log_level(&self) -> String {
        self.settings.get_log_level()
    }
}

impl ValidatedSettings {
    pub fn new(settings: Settings) -> Result<Self, ValidationError> {
        settings.validate()?;
        Ok(ValidatedSettings(settings))
    }
}

// Implement Deref to allow transparent access to Settings fields
impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_come_from_embedded_config() {
        let settings = ConfigManager::load_settings(None, &HashMap::new()).unwrap();

        assert_eq!(settings.get_log_level(), "info");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert!(settings.resolver.enabled);
        assert_eq!(settings.server.address, "0.0.0.0:8000");
        assert!(settings.server.auth_token.is_empty());
        assert!(settings.server.resources.is_empty());
        assert_eq!(settings.failure_policy(), FailurePolicy::RequireAll);
        assert_eq!(settings.slack_webhook_url().unwrap(), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn legacy_environment_overrides_defaults() {
        let env = env(&[
            (
                "RESOURCE_URLS",
                r#"["tcp://db:5432", "https://api.example.com/healthcheck"]"#,
            ),
            ("AUTH_TOKEN", "s3cret"),
            ("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/X"),
            ("FORCE_SUCCESS_RESPONSE", "1"),
        ]);

        let settings = ConfigManager::load_settings(None, &env).unwrap();

        assert_eq!(settings.server.auth_token, "s3cret");
        assert_eq!(settings.failure_policy(), FailurePolicy::ForceSuccess);
        assert_eq!(settings.resource_descriptors().unwrap().len(), 2);
        assert_eq!(
            settings.slack_webhook_url().unwrap().unwrap().as_str(),
            "https://hooks.slack.com/services/T/B/X"
        );
    }

    #[test]
    fn force_success_requires_exactly_one() {
        let settings =
            ConfigManager::load_settings(None, &env(&[("FORCE_SUCCESS_RESPONSE", "true")])).unwrap();

        assert_eq!(settings.failure_policy(), FailurePolicy::RequireAll);
    }

    #[test]
    fn prefixed_environment_maps_to_nested_keys() {
        let env = env(&[
            ("RESCHECK_CHECK__TIMEOUT", "7"),
            ("RESCHECK_RESOLVER__ENABLED", "false"),
            ("RESCHECK_RESOLVER__MAX_ATTEMPTS", "2"),
            ("RESCHECK_LOG__LEVEL", "debug"),
        ]);

        let settings = ConfigManager::load_settings(None, &env).unwrap();

        assert_eq!(settings.timeout(), Duration::from_secs(7));
        assert_eq!(settings.get_log_level(), "debug");
        let options = settings.checker_options(true);
        assert!(options.check_health_payload);
        assert!(!options.resolve_hostnames);
        assert_eq!(options.retry.max_attempts, 2);
    }

    #[test]
    fn malformed_resource_list_is_a_config_error() {
        let result = ConfigManager::load_settings(None, &env(&[("RESOURCE_URLS", "tcp://db:5432")]));

        assert!(result.is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut settings = ConfigManager::load_settings(None, &HashMap::new()).unwrap();
        settings.log.level = "verbose".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidLogLevel(_))
        ));

        let mut settings = ConfigManager::load_settings(None, &HashMap::new()).unwrap();
        settings.check.timeout = 0;
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidTimeout(0))
        ));

        let mut settings = ConfigManager::load_settings(None, &HashMap::new()).unwrap();
        settings.resolver.max_attempts = 0;
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidMaxAttempts(0))
        ));

        let mut settings = ConfigManager::load_settings(None, &HashMap::new()).unwrap();
        settings.server.resources = vec!["no scheme here".to_string()];
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidResource { .. })
        ));

        let mut settings = ConfigManager::load_settings(None, &HashMap::new()).unwrap();
        settings.server.address = "localhost".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidAddress(_))
        ));
    }

    #[test]
    fn manager_reads_config_path_from_environment() {
        let env = env(&[("RESCHECK_CONFIG_PATH", "/nonexistent/resource-checker.toml")]);

        let manager = ConfigManager::new(&env).unwrap();

        assert_eq!(
            manager.config_path.as_deref(),
            Some(Path::new("/nonexistent/resource-checker.toml"))
        );
        assert_eq!(manager.get_log_level(), "info");
    }
}
