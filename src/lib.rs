//! Tile layout and selection engine for a video pin board.
//!
//! A host feeds the engine a roster of tiles, selection toggles, and viewport
//! sizes; the engine answers with a [`LayoutFrame`] describing the grid, the
//! large presenter and pinned slots, and the bounded strip of remaining tiles.
//! The `render` and `runtime` modules are a terminal host built on top of it.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod overflow;
pub mod render;
pub mod roster;
pub mod runtime;
pub mod selection;
pub mod viewport;
pub mod width;

pub use engine::{
    DEFAULT_METRICS_TARGET, EngineConfig, LayoutFrame, MoreAffordance, PinBoardEngine, PlacedTile,
    TileEvent, TileIntent, TileRole, compose_frame,
};
pub use error::{PinboardError, Result};
pub use geometry::{Rect, Size};
pub use grid::{CellSpan, GridGeometry, LayoutMode, MAX_GRID_SIZE, SlotRects, calculate_grid_size};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{EngineMetrics, MetricSnapshot};
pub use notify::{LoggingPinNotifier, NullPinNotifier, PinNotice, PinNotifier, RecordingPinNotifier};
pub use overflow::{OverflowPartition, StripMetrics, StripView};
pub use render::{AnsiRenderer, RendererSettings};
pub use roster::{DEFAULT_VISIBLE_COUNT, RosterStore, Tile, TileId, VISIBLE_COUNT_PRESETS};
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{BoardRuntime, RuntimeConfig, RuntimeEvent};
pub use selection::{Axis, SelectionAxes, SelectionChange, SelectionState};
pub use viewport::{ViewportFeed, ViewportSettings, ViewportTracker};
pub use width::{display_width, truncate_to_width};
