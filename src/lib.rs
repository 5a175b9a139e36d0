//! Reachability and health checks for TCP, UDP and HTTP(S) resources.
//!
//! [`checker::ResourceChecker`] checks a single resource,
//! [`aggregator::Aggregator`] reduces a list of them into one answer, and
//! [`server`] exposes both over HTTP.

pub mod aggregator;
pub mod checker;
pub mod notifier;
pub mod server;
pub mod settings;
