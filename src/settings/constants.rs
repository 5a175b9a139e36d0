/// Prefix of environment variables mapped onto settings keys, e.g.
/// `RESCHECK_SERVER__AUTH_TOKEN` for `server.auth_token`.
pub const ENV_PREFIX: &str = "RESCHECK";

/// Environment variable pointing at an optional TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "RESCHECK_CONFIG_PATH";

/// Environment variables understood for compatibility with existing
/// deployments. They win over every other source.
pub const RESOURCE_URLS_ENV: &str = "RESOURCE_URLS";
pub const AUTH_TOKEN_ENV: &str = "AUTH_TOKEN";
pub const SLACK_WEBHOOK_URL_ENV: &str = "SLACK_WEBHOOK_URL";
pub const FORCE_SUCCESS_ENV: &str = "FORCE_SUCCESS_RESPONSE";

/// Built-in configuration, layered below the file and the environment.
pub const DEFAULT_CONFIG: &str = r#"
# Logging configuration
[log]
# Level can be "error", "warn", "info", "debug", or "trace"
level = "info"

# Per-resource check settings
[check]
# Timeout in seconds for a single dial or request
timeout = 30

# Hostname resolution for tcp:// and udp:// resources
[resolver]
# When disabled the dialer resolves the hostname itself
enabled = true
max_attempts = 5
# Seconds to wait between two failed lookups
retry_delay = 3

# Aggregate health server
[server]
address = "0.0.0.0:8000"
# Expected value of the X-Auth-Token header
auth_token = ""
# Report success even when a resource is unhealthy
force_success = false
# Resources checked by /healthcheck, e.g. ["tcp://db:5432", "https://api/healthcheck"]
resources = []

# Failure notifications
[notification]
# Slack incoming webhook, empty to disable
slack_webhook_url = ""
"#;
