// Standard library
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

// 3rd party crates
use tokio::io::AsyncWriteExt;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tokio::time::timeout;
use tracing::debug;

// Current module imports
use super::errors::CheckError;
use super::types::Scheme;

/// Where a socket probe dials to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialTarget {
    /// Already resolved address.
    Address(SocketAddr),
    /// Host name handed to the dialer, which resolves it itself.
    Host(String, u16),
}

impl DialTarget {
    fn describe(&self) -> String {
        match self {
            DialTarget::Address(address) => address.to_string(),
            DialTarget::Host(host, port) => format!("{}:{}", host, port),
        }
    }
}

/// Opens and closes a stream or datagram connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct SocketProbe;

impl SocketProbe {
    /// Succeeds once the connection is established and closed again.
    ///
    /// For `udp` this only proves that a local socket could be bound and
    /// routed towards the target; nothing is sent to the remote side.
    pub async fn probe(
        &self,
        scheme: &Scheme,
        target: &DialTarget,
        limit: Duration,
    ) -> Result<(), CheckError> {
        let address: String = target.describe();
        debug!(scheme = %scheme, address = %address, "Dialing resource");

        let dial = async {
            match scheme {
                Scheme::Udp => dial_udp(target).await,
                _ => dial_tcp(target).await,
            }
        };

        match timeout(limit, dial).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(CheckError::Connect {
                scheme: scheme.to_string(),
                address,
                source,
            }),
            Err(_) => Err(CheckError::ConnectTimeout {
                scheme: scheme.to_string(),
                address,
                timeout: limit,
            }),
        }
    }
}

async fn dial_tcp(target: &DialTarget) -> std::io::Result<()> {
    let mut stream: TcpStream = match target {
        DialTarget::Address(address) => TcpStream::connect(address).await?,
        DialTarget::Host(host, port) => TcpStream::connect((host.as_str(), *port)).await?,
    };

    // A connection that cannot be closed cleanly does not count as healthy.
    stream.shutdown().await
}

async fn dial_udp(target: &DialTarget) -> std::io::Result<()> {
    let address: SocketAddr = match target {
        DialTarget::Address(address) => *address,
        DialTarget::Host(host, port) => lookup_host((host.as_str(), *port))
            .await?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no address found for {}", host),
                )
            })?,
    };

    let local: SocketAddr = match address.ip() {
        IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    };

    let socket: UdpSocket = UdpSocket::bind(local).await?;
    socket.connect(address).await
}
