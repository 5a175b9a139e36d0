// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
    #[error("Check timeout must be greater than 0, got {0}")]
    InvalidTimeout(u64),
    #[error("Resolver max_attempts must be greater than 0, got {0}")]
    InvalidMaxAttempts(u32),
    #[error("Invalid server address '{0}'")]
    InvalidAddress(String),
    #[error("Invalid resource '{url}': {reason}")]
    InvalidResource { url: String, reason: String },
    #[error("Invalid Slack webhook url '{url}': {reason}")]
    InvalidWebhookUrl { url: String, reason: String },
}
