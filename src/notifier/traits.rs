// 3rd party crates
use async_trait::async_trait;

// Current module imports
use super::errors::NotificationError;

/// Side channel told about unhealthy resources.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `message` and returns whatever the sink answered.
    async fn notify(&self, message: &str) -> Result<String, NotificationError>;
}
