// Standard library
use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;

/// Name lookup backend used by the resolver.
#[async_trait]
pub trait HostLookup: Send + Sync {
    /// Returns every IPv4 address the name resolves to.
    async fn lookup_ipv4(&self, host: &str) -> io::Result<Vec<Ipv4Addr>>;
}

/// Wait between two resolution attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
