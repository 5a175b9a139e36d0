// Standard library
use std::sync::Arc;
use std::time::{Duration, Instant};

// 3rd party crates
use tracing::{error, info, warn};

// Project imports
use crate::checker::{CheckOutcome, HealthPayload, ResourceChecker, ResourceDescriptor};
use crate::notifier::Notifier;

// Current module imports
use super::types::{AggregateOutcome, Aggregator, FailurePolicy, ResourceReport};

impl FailurePolicy {
    pub fn from_force_success(force_success: bool) -> Self {
        if force_success {
            FailurePolicy::ForceSuccess
        } else {
            FailurePolicy::RequireAll
        }
    }

    /// Reduces the per-resource results into the reported health.
    pub fn reduce(&self, reports: &[ResourceReport]) -> bool {
        match self {
            FailurePolicy::RequireAll => reports.iter().all(|report| report.outcome.healthy),
            FailurePolicy::ForceSuccess => true,
        }
    }
}

impl AggregateOutcome {
    /// Body served by the aggregate health endpoint.
    pub fn payload(&self) -> HealthPayload {
        HealthPayload {
            success: self.healthy,
            message: None,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ResourceReport> {
        self.per_resource
            .iter()
            .filter(|report| !report.outcome.healthy)
    }
}

impl Aggregator {
    pub fn new(
        checker: ResourceChecker,
        resources: Vec<ResourceDescriptor>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            checker,
            resources: resources.into(),
            policy,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Checks the configured resources.
    pub async fn check_configured(&self, timeout: Duration) -> AggregateOutcome {
        self.check_all(&self.resources, timeout).await
    }

    /// Checks every descriptor in order. A failing resource never stops the
    /// pass, so the report always covers the whole list.
    pub async fn check_all(
        &self,
        descriptors: &[ResourceDescriptor],
        timeout: Duration,
    ) -> AggregateOutcome {
        let mut per_resource: Vec<ResourceReport> = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            info!(
                url = %descriptor,
                "Checking: {} (max timeout: {}s)",
                descriptor,
                timeout.as_secs()
            );

            let started: Instant = Instant::now();
            let outcome: CheckOutcome = self.checker.check(descriptor, timeout).await;

            match &outcome.detail {
                None => info!(
                    url = %descriptor,
                    duration = ?started.elapsed(),
                    "Ok: {}",
                    descriptor
                ),
                Some(detail) => {
                    error!(url = %descriptor, "Error: {}", detail);
                    self.notify_failure(descriptor).await;
                }
            }

            per_resource.push(ResourceReport {
                descriptor: descriptor.clone(),
                outcome,
            });
        }

        AggregateOutcome {
            healthy: self.policy.reduce(&per_resource),
            per_resource,
        }
    }

    /// Tells the notifier about an unhealthy resource. Delivery problems are
    /// logged and never change the outcome.
    async fn notify_failure(&self, descriptor: &ResourceDescriptor) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let message: String = format!("*{} is not healthy!*", descriptor.as_str());
        match notifier.notify(&message).await {
            Ok(response) => info!(url = %descriptor, "Slack response: {}", response),
            Err(e) => warn!(url = %descriptor, error = %e, "Failed to send notification"),
        }
    }
}
