//! Error module orchestrator.
//!
//! Engine operations are infallible; the types here cover the fallible edges
//! around it (configuration parsing, log sinks, terminal I/O).

mod types;

pub use types::{PinboardError, Result};
