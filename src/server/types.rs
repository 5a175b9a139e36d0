// Standard library
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use serde::Deserialize;

// Project imports
use crate::aggregator::Aggregator;
use crate::checker::ResourceChecker;

/// Header carrying the shared secret.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Shared, read-only state of the health server.
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<ResourceChecker>,
    pub aggregator: Arc<Aggregator>,
    pub auth_token: Arc<str>,
    pub timeout: Duration,
}

/// Query string of `GET /check`.
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub url: Option<String>,
}
