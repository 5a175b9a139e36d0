//! Resource availability checks.
//!
//! A resource is described by a url. `tcp://` and `udp://` resources are
//! dialed (optionally after resolving the host to IPv4 with bounded retry),
//! every other scheme is fetched over HTTP and judged by its status code and,
//! for paths ending in `/healthcheck`, by the `{"success": bool}` body it
//! returns. The latter lets one checker probe another checker's aggregate
//! endpoint.

pub mod constants;
pub mod dispatcher;
pub mod errors;
pub mod http;
pub mod impls;
pub mod resolver;
pub mod socket;
pub mod traits;
pub mod types;

pub use dispatcher::ResourceChecker;
pub use errors::CheckError;
pub use http::{BufferedResponse, HttpProbe};
pub use resolver::{Resolver, SystemLookup, TokioSleeper};
pub use socket::{DialTarget, SocketProbe};
pub use traits::{HostLookup, Sleeper};
pub use types::{CheckOutcome, CheckerOptions, HealthPayload, ResourceDescriptor, RetryPolicy, Scheme};
