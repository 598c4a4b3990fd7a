//! Overflow module orchestrator.

mod core;

pub use self::core::{OverflowPartition, StripMetrics, StripView, partition, strip_capacity, strip_view};
