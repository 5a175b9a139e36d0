//! Reduction of many resource checks into one health answer.

pub mod impls;
pub mod types;

pub use types::{AggregateOutcome, Aggregator, FailurePolicy, ResourceReport};
