// Standard library
use std::time::Duration;

// 3rd party crates
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

// Current module imports
use super::constants::{HEALTHCHECK_PATH_SUFFIX, MAX_HEALTHY_STATUS, MIN_HEALTHY_STATUS};
use super::errors::CheckError;
use super::types::HealthPayload;

/// A response whose body has been read to the end.
///
/// The body is kept as shared bytes so it can be logged, relayed and
/// decoded as many times as needed.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    pub body: Bytes,
}

impl BufferedResponse {
    pub fn payload(&self) -> HealthPayload {
        HealthPayload::from_body(&self.body)
    }
}

/// Issues GET requests and judges status and nested health payloads.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl HttpProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn probe(
        &self,
        url: &Url,
        limit: Duration,
        check_health_payload: bool,
    ) -> Result<(), CheckError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(limit)
            .send()
            .await
            .map_err(|source| CheckError::HttpTransport {
                url: url.to_string(),
                source,
            })?;

        let status: StatusCode = response.status();
        debug!(url = %url, status = %status, "Received response");

        if !is_healthy_status(status) {
            return Err(CheckError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if !(check_health_payload && is_healthcheck_path(url)) {
            return Ok(());
        }

        let body: Bytes = response
            .bytes()
            .await
            .map_err(|source| CheckError::HttpTransport {
                url: url.to_string(),
                source,
            })?;
        let buffered = BufferedResponse { body };

        debug!(
            url = %url,
            body = %String::from_utf8_lossy(&buffered.body),
            "Received health payload"
        );

        if buffered.payload().success {
            Ok(())
        } else {
            Err(CheckError::UnhealthyPayload {
                url: url.to_string(),
            })
        }
    }
}

fn is_healthy_status(status: StatusCode) -> bool {
    (MIN_HEALTHY_STATUS..=MAX_HEALTHY_STATUS).contains(&status.as_u16())
}

fn is_healthcheck_path(url: &Url) -> bool {
    url.path().ends_with(HEALTHCHECK_PATH_SUFFIX)
}
