//! Engine module orchestrator.
//!
//! `PinBoardEngine` owns the roster, selection, expanded flag and viewport
//! tracker, and re-runs the pure layout pipeline after every discrete event.
//! The composed [`LayoutFrame`] is what renderers consume.

mod config;
mod core;
mod frame;
mod intent;

pub use config::{DEFAULT_METRICS_TARGET, EngineConfig};
pub use self::core::PinBoardEngine;
pub use frame::{LayoutFrame, MoreAffordance, PlacedTile, TileRole, compose_frame};
pub use intent::{TileEvent, TileIntent};
