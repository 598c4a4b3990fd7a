//! Grid module orchestrator.
//!
//! `core` resolves the abstract grid (rows, columns, large-slot spans) from the
//! roster size and selection; `tracks` places that grid on a concrete surface.

mod core;
pub mod tracks;

pub use self::core::{CellSpan, GridGeometry, LayoutMode, MAX_GRID_SIZE, calculate_grid_size, resolve};
pub use tracks::{SlotRects, Track};
