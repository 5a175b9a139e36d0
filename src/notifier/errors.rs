// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Failed to send notification: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Notification endpoint answered HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}
