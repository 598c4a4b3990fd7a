//! Viewport module orchestrator.

mod core;

pub use self::core::{FEED_CAPACITY, ViewportFeed, ViewportSettings, ViewportTracker};
