// Standard library
use std::time::Duration;

// 3rd party crates
use thiserror::Error;

/// Terminal failure of a single resource check.
///
/// The `Display` text of every variant ends up as `CheckOutcome::detail`, so
/// the messages are written for humans reading logs and JSON responses.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid resource url '{url}': {source}")]
    Parse {
        url: String,
        source: url::ParseError,
    },

    #[error("Resource url '{0}' has no host")]
    MissingHost(String),

    #[error("Resource url '{0}' has no port")]
    MissingPort(String),

    #[error("Failed to resolve '{host}' after {attempts} attempts: {message}")]
    Resolution {
        host: String,
        attempts: u32,
        message: String,
    },

    #[error("dial {scheme} {address}: {source}")]
    Connect {
        scheme: String,
        address: String,
        source: std::io::Error,
    },

    #[error("dial {scheme} {address}: timed out after {timeout:?}")]
    ConnectTimeout {
        scheme: String,
        address: String,
        timeout: Duration,
    },

    #[error("Get \"{url}\": {source}")]
    HttpTransport { url: String, source: reqwest::Error },

    #[error("{url} is unavailable! [{status}]")]
    HttpStatus { url: String, status: u16 },

    #[error("{url} is not healthy!")]
    UnhealthyPayload { url: String },
}

impl CheckError {
    /// Whether the error comes from reading the resource string rather than
    /// from probing the resource.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, CheckError::Parse { .. } | CheckError::MissingHost(_))
    }
}
