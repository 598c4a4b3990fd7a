//! Selection module orchestrator.
//!
//! Presenter and pinned are two independent single-slot axes that refer to
//! roster tiles by identifier only.

mod core;

pub use self::core::{Axis, LargeSlots, RepairReport, SelectionAxes, SelectionChange, SelectionState};
