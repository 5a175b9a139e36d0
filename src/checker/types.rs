// Standard library
use std::time::Duration;

// 3rd party crates
use serde::{Deserialize, Serialize};
use url::Url;

/// Transport family of a resource, taken from the url scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    Tcp,
    Udp,
    Http,
    Https,
    /// Any other scheme. Checked as an HTTP resource.
    Other(String),
}

/// A checkable endpoint, parsed once from a url-shaped string.
///
/// `url` is the normalized form used for dialing and requests. `raw` keeps
/// the string as configured for logs and notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub(super) raw: String,
    pub(super) url: Url,
    pub(super) scheme: Scheme,
    pub(super) host: String,
    pub(super) port: Option<u16>,
    pub(super) path: String,
}

/// Result of checking one resource. `detail` is only set on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub healthy: bool,
    pub detail: Option<String>,
}

/// JSON body exchanged by health endpoints: `{"success": bool}`.
///
/// Missing fields decode as `success = false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPayload {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Bounded retry used for hostname resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Switches that differ between the one-shot and the server mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Interpret `{"success": bool}` bodies of urls ending in `/healthcheck`.
    pub check_health_payload: bool,
    /// Resolve socket hosts to IPv4 with retry before dialing. When off the
    /// dialer resolves the host itself.
    pub resolve_hostnames: bool,
    pub retry: RetryPolicy,
}
