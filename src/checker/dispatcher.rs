// Standard library
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

// Current module imports
use super::errors::CheckError;
use super::http::HttpProbe;
use super::resolver::Resolver;
use super::socket::{DialTarget, SocketProbe};
use super::types::{CheckOutcome, CheckerOptions, ResourceDescriptor};

/// Routes a resource to the socket or the HTTP probe.
#[derive(Clone)]
pub struct ResourceChecker {
    options: CheckerOptions,
    resolver: Resolver,
    socket: SocketProbe,
    http: HttpProbe,
}

impl ResourceChecker {
    pub fn new(options: CheckerOptions) -> Self {
        Self::with_parts(options, Resolver::new(options.retry), HttpProbe::default())
    }

    pub fn with_parts(options: CheckerOptions, resolver: Resolver, http: HttpProbe) -> Self {
        Self {
            options,
            resolver,
            socket: SocketProbe,
            http,
        }
    }

    /// Checks one resource and folds any failure into the outcome.
    pub async fn check(&self, descriptor: &ResourceDescriptor, timeout: Duration) -> CheckOutcome {
        self.probe(descriptor, timeout).await.into()
    }

    /// Parses `url` and checks it. A malformed url is returned as an error
    /// instead of an unhealthy outcome.
    pub async fn check_url(&self, url: &str, timeout: Duration) -> Result<CheckOutcome, CheckError> {
        let descriptor: ResourceDescriptor = ResourceDescriptor::parse(url)?;
        Ok(self.check(&descriptor, timeout).await)
    }

    pub async fn probe(
        &self,
        descriptor: &ResourceDescriptor,
        timeout: Duration,
    ) -> Result<(), CheckError> {
        if descriptor.scheme().is_socket() {
            self.probe_socket(descriptor, timeout).await
        } else {
            self.http
                .probe(descriptor.url(), timeout, self.options.check_health_payload)
                .await
        }
    }

    async fn probe_socket(
        &self,
        descriptor: &ResourceDescriptor,
        timeout: Duration,
    ) -> Result<(), CheckError> {
        let port: u16 = descriptor
            .port()
            .ok_or_else(|| CheckError::MissingPort(descriptor.to_string()))?;

        let target: DialTarget = if let Some(ip) = descriptor.ip_literal() {
            DialTarget::Address(SocketAddr::new(ip, port))
        } else if self.options.resolve_hostnames {
            let ip = self.resolver.resolve(descriptor.host()).await?;
            DialTarget::Address(SocketAddr::new(IpAddr::V4(ip), port))
        } else {
            DialTarget::Host(descriptor.host().to_string(), port)
        };

        self.socket
            .probe(descriptor.scheme(), &target, timeout)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::net::TcpListener;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::checker::traits::{HostLookup, Sleeper};
    use crate::checker::types::RetryPolicy;

    struct FixedLookup {
        answer: Option<Ipv4Addr>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl HostLookup for FixedLookup {
        async fn lookup_ipv4(&self, _host: &str) -> io::Result<Vec<Ipv4Addr>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Some(ip) => Ok(vec![ip]),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "no such host")),
            }
        }
    }

    struct NoSleep;

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, _duration: Duration) {}
    }

    fn checker(answer: Option<Ipv4Addr>, resolve_hostnames: bool) -> (ResourceChecker, Arc<FixedLookup>) {
        let options = CheckerOptions {
            check_health_payload: true,
            resolve_hostnames,
            retry: RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_secs(3),
            },
        };
        let lookup = Arc::new(FixedLookup {
            answer,
            calls: AtomicU32::new(0),
        });
        let resolver = Resolver::with_backends(options.retry, lookup.clone(), Arc::new(NoSleep));
        (
            ResourceChecker::with_parts(options, resolver, HttpProbe::default()),
            lookup,
        )
    }

    #[tokio::test]
    async fn tcp_resource_is_resolved_then_dialed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (checker, lookup) = checker(Some(Ipv4Addr::LOCALHOST), true);

        let descriptor = ResourceDescriptor::parse(&format!("tcp://database:{}", port)).unwrap();
        let outcome = checker.check(&descriptor, Duration::from_secs(2)).await;

        assert_eq!(outcome, CheckOutcome::healthy());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unresolvable_host_is_unhealthy() {
        let (checker, lookup) = checker(None, true);

        let descriptor = ResourceDescriptor::parse("tcp://database:5432").unwrap();
        let outcome = checker.check(&descriptor, Duration::from_secs(2)).await;

        assert!(!outcome.healthy);
        assert!(outcome.detail.unwrap().contains("after 2 attempts"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn resolution_can_be_left_to_the_dialer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (checker, lookup) = checker(None, false);

        let outcome = checker
            .check_url(&format!("tcp://localhost:{}", port), Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(outcome, CheckOutcome::healthy());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn closed_port_is_unhealthy_without_hanging() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let (checker, _) = checker(None, true);

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            checker.check_url(&format!("tcp://127.0.0.1:{}", port), Duration::from_secs(2)),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(!outcome.healthy);
        assert!(outcome.detail.is_some());
    }

    #[tokio::test]
    async fn socket_resource_without_port_is_unhealthy() {
        let (checker, _) = checker(Some(Ipv4Addr::LOCALHOST), true);

        let outcome = checker
            .check_url("tcp://database", Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CheckOutcome::unhealthy("Resource url 'tcp://database' has no port")
        );
    }

    #[tokio::test]
    async fn http_resource_goes_through_http_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let (checker, lookup) = checker(None, true);

        let url = format!("{}/ready", server.uri());
        let outcome = checker.check_url(&url, Duration::from_secs(2)).await.unwrap();

        assert_eq!(
            outcome,
            CheckOutcome::unhealthy(format!("{} is unavailable! [503]", url))
        );
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_url_is_an_error_not_an_outcome() {
        let (checker, _) = checker(None, true);

        let err = checker
            .check_url("::not-a-url::", Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(err.is_parse_error());
    }
}
