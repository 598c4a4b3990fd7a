//! Render module orchestrator.
//!
//! Terminal renderer for [`LayoutFrame`](crate::engine::LayoutFrame)s. The
//! engine never depends on it; hosts with their own surface ignore this module.

mod core;

pub use self::core::{AnsiRenderer, RendererSettings};
