// Standard library
use std::time::Instant;

// 3rd party crates
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

// Project imports
use crate::checker::{CheckOutcome, HealthPayload, ResourceDescriptor};

// Current module imports
use super::types::{AppState, CheckQuery, AUTH_TOKEN_HEADER};

impl AppState {
    /// The header bytes must equal the configured token. With no token
    /// configured a request without the header is accepted.
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let presented: &[u8] = headers
            .get(AUTH_TOKEN_HEADER)
            .map(|value| value.as_bytes())
            .unwrap_or_default();
        presented == self.auth_token.as_bytes()
    }
}

/// `GET /check?url=<resource>`: checks one ad hoc resource.
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CheckQuery>,
) -> Response {
    if !state.is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let raw: String = match query.url {
        Some(url) if !url.trim().is_empty() => url,
        _ => return StatusCode::BAD_REQUEST.into_response(),
    };

    let descriptor: ResourceDescriptor = match ResourceDescriptor::parse(&raw) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!(url = %raw, error = %e, "Rejected check request");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    info!(
        "Checking: {} (max timeout: {}s)",
        descriptor,
        state.timeout.as_secs()
    );

    let started: Instant = Instant::now();
    let outcome: CheckOutcome = state.checker.check(&descriptor, state.timeout).await;

    info!(
        "Checked: {} (duration: {:?})",
        descriptor,
        started.elapsed()
    );

    Json(HealthPayload::from(&outcome)).into_response()
}

/// `GET /healthcheck`: aggregate health of the configured resources.
///
/// Always answers 200; health travels in the body only.
pub async fn healthcheck(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !state.is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let outcome = state.aggregator.check_configured(state.timeout).await;
    Json(outcome.payload()).into_response()
}
