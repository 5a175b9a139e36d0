// Standard library
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;
use tracing::{debug, warn};

// Current module imports
use super::errors::CheckError;
use super::traits::{HostLookup, Sleeper};
use super::types::RetryPolicy;

/// Resolves through the operating system resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLookup;

#[async_trait]
impl HostLookup for SystemLookup {
    async fn lookup_ipv4(&self, host: &str) -> io::Result<Vec<Ipv4Addr>> {
        let addresses = tokio::net::lookup_host((host, 0)).await?;
        Ok(addresses
            .filter_map(|address: SocketAddr| match address.ip() {
                IpAddr::V4(ip) => Some(ip),
                IpAddr::V6(_) => None,
            })
            .collect())
    }
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// IPv4 resolver with bounded retry.
#[derive(Clone)]
pub struct Resolver {
    policy: RetryPolicy,
    lookup: Arc<dyn HostLookup>,
    sleeper: Arc<dyn Sleeper>,
}

impl Resolver {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_backends(policy, Arc::new(SystemLookup), Arc::new(TokioSleeper))
    }

    pub fn with_backends(
        policy: RetryPolicy,
        lookup: Arc<dyn HostLookup>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            policy,
            lookup,
            sleeper,
        }
    }

    /// Resolves `host` to its first IPv4 address.
    ///
    /// Lookups are retried up to `max_attempts` times with `delay` between
    /// failures. An empty answer counts as a failure. Worst case this blocks
    /// for `(max_attempts - 1) * delay` plus the lookups themselves, on top of
    /// any connect timeout.
    pub async fn resolve(&self, host: &str) -> Result<Ipv4Addr, CheckError> {
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Ok(ip);
        }

        let attempts: u32 = self.policy.max_attempts.max(1);
        let mut last_error: String = String::from("no lookup attempted");

        for attempt in 1..=attempts {
            match self.lookup.lookup_ipv4(host).await {
                Ok(addresses) => match addresses.first() {
                    Some(ip) => {
                        debug!(host = %host, attempt, "Resolved IP address: {}", ip);
                        return Ok(*ip);
                    }
                    None => last_error = String::from("no IPv4 address found"),
                },
                Err(e) => last_error = e.to_string(),
            }

            warn!(
                host = %host,
                attempt,
                error = %last_error,
                "Hostname lookup failed"
            );

            if attempt < attempts {
                self.sleeper.sleep(self.policy.delay).await;
            }
        }

        Err(CheckError::Resolution {
            host: host.to_string(),
            attempts,
            message: last_error,
        })
    }
}
