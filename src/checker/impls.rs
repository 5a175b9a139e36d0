// Standard library
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

// 3rd party crates
use url::Url;

// Current module imports
use super::constants::{DEFAULT_RESOLVE_ATTEMPTS, DEFAULT_RESOLVE_DELAY_SECS};
use super::errors::CheckError;
use super::types::{CheckOutcome, CheckerOptions, HealthPayload, ResourceDescriptor, RetryPolicy, Scheme};

impl Scheme {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "tcp" => Scheme::Tcp,
            "udp" => Scheme::Udp,
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => Scheme::Other(other.to_string()),
        }
    }

    /// Socket-style schemes are dialed, everything else goes through HTTP.
    pub fn is_socket(&self) -> bool {
        matches!(self, Scheme::Tcp | Scheme::Udp)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Scheme::Tcp => "tcp",
            Scheme::Udp => "udp",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Other(name) => name,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResourceDescriptor {
    pub fn parse(input: &str) -> Result<Self, CheckError> {
        let raw: &str = input.trim();
        let url: Url = Url::parse(raw).map_err(|source| CheckError::Parse {
            url: input.to_string(),
            source,
        })?;

        let host: String = match url.host_str() {
            Some(host) if !host.is_empty() => host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .to_string(),
            _ => return Err(CheckError::MissingHost(input.to_string())),
        };

        Ok(Self {
            scheme: Scheme::from_name(url.scheme()),
            port: url.port_or_known_default(),
            path: url.path().to_string(),
            host,
            url,
            raw: raw.to_string(),
        })
    }

    /// The resource as it was configured, without surrounding whitespace.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Host without IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The host as an IP address when it is a literal.
    pub fn ip_literal(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

impl FromStr for ResourceDescriptor {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl CheckOutcome {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            detail: None,
        }
    }

    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            healthy: false,
            detail: Some(detail.into()),
        }
    }
}

impl From<Result<(), CheckError>> for CheckOutcome {
    fn from(result: Result<(), CheckError>) -> Self {
        match result {
            Ok(()) => CheckOutcome::healthy(),
            Err(e) => CheckOutcome::unhealthy(e.to_string()),
        }
    }
}

impl From<&CheckOutcome> for HealthPayload {
    fn from(outcome: &CheckOutcome) -> Self {
        Self {
            success: outcome.healthy,
            message: outcome.detail.clone(),
        }
    }
}

impl HealthPayload {
    /// Decodes a buffered body. Anything that is not a JSON object with a
    /// boolean `success` reads as unhealthy.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RESOLVE_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_RESOLVE_DELAY_SECS),
        }
    }
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            check_health_payload: false,
            resolve_hostnames: true,
            retry: RetryPolicy::default(),
        }
    }
}
