// Standard library
use std::sync::Arc;

// Project imports
use crate::checker::{CheckOutcome, ResourceChecker, ResourceDescriptor};
use crate::notifier::Notifier;

/// How individual failures reduce into the aggregate result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Healthy only when every resource is healthy.
    #[default]
    RequireAll,
    /// Always report healthy. Per-resource results stay truthful.
    ForceSuccess,
}

/// Outcome of one resource within an aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    pub descriptor: ResourceDescriptor,
    pub outcome: CheckOutcome,
}

/// Result of checking a list of resources, in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOutcome {
    pub healthy: bool,
    pub per_resource: Vec<ResourceReport>,
}

/// Checks a configured list of resources one after another.
#[derive(Clone)]
pub struct Aggregator {
    pub(super) checker: ResourceChecker,
    pub(super) resources: Arc<[ResourceDescriptor]>,
    pub(super) policy: FailurePolicy,
    pub(super) notifier: Option<Arc<dyn Notifier>>,
}
