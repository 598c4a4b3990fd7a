//! Grid geometry resolution.
//!
//! The base grid edge follows a fixed breakpoint table rather than a true
//! square root:
//!
//! | tiles   | edge |
//! |---------|------|
//! | 0..=1   | 1    |
//! | 2..=4   | 2    |
//! | 5..=16  | 4    |
//! | 17..    | 6    |
//!
//! Six is a saturation cap. Rosters larger than 25 keep a 6×6 grid instead of
//! growing, and anything beyond the 36 cells is reported as overflow.
//!
//! Spans are zero-based and half-open: a span of columns `0..2` covers the
//! first two columns.

use std::ops::Range;

use serde::Serialize;

/// Largest grid edge the resolver will ever produce.
pub const MAX_GRID_SIZE: u16 = 6;

/// Base grid edge for `tile_count` tiles.
pub fn calculate_grid_size(tile_count: usize) -> u16 {
    match tile_count {
        0..=1 => 1,
        2..=4 => 2,
        5..=16 => 4,
        _ => MAX_GRID_SIZE,
    }
}

/// Rectangular block of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellSpan {
    pub col_start: u16,
    pub col_end: u16,
    pub row_start: u16,
    pub row_end: u16,
}

impl CellSpan {
    pub fn new(cols: Range<u16>, rows: Range<u16>) -> Self {
        Self {
            col_start: cols.start,
            col_end: cols.end,
            row_start: rows.start,
            row_end: rows.end,
        }
    }

    pub fn cols(&self) -> Range<u16> {
        self.col_start..self.col_end
    }

    pub fn rows(&self) -> Range<u16> {
        self.row_start..self.row_end
    }

    pub fn col_count(&self) -> u16 {
        self.col_end.saturating_sub(self.col_start)
    }

    pub fn row_count(&self) -> u16 {
        self.row_end.saturating_sub(self.row_start)
    }

    pub fn is_empty(&self) -> bool {
        self.col_count() == 0 || self.row_count() == 0
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.cols().contains(&col) && self.rows().contains(&row)
    }

    pub fn overlaps(&self, other: &CellSpan) -> bool {
        self.col_start < other.col_end
            && other.col_start < self.col_end
            && self.row_start < other.row_end
            && other.row_start < self.row_end
    }
}

/// How many large slots the geometry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Plain grid, every tile in its own cell.
    Grid,
    /// One large tile above the strip row.
    Single,
    /// Presenter and pinned share the area above the strip row.
    Dual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridGeometry {
    pub columns: u16,
    pub rows: u16,
    pub presenter: Option<CellSpan>,
    pub pinned: Option<CellSpan>,
    /// Row reserved for the strip; `None` in plain grid mode.
    pub strip_row: Option<u16>,
}

impl GridGeometry {
    pub fn mode(&self) -> LayoutMode {
        match (self.presenter.is_some(), self.pinned.is_some()) {
            (true, true) => LayoutMode::Dual,
            (false, false) => LayoutMode::Grid,
            _ => LayoutMode::Single,
        }
    }

    pub fn has_large_view(&self) -> bool {
        self.mode() != LayoutMode::Grid
    }

    /// Cells available to ordinary tiles in plain grid mode.
    pub fn grid_cells(&self) -> usize {
        match self.mode() {
            LayoutMode::Grid => usize::from(self.columns) * usize::from(self.rows),
            _ => 0,
        }
    }

    /// Row-major position of the `index`-th plain grid cell.
    pub fn cell_position(&self, index: usize) -> Option<(u16, u16)> {
        if index >= self.grid_cells() {
            return None;
        }
        let columns = usize::from(self.columns);
        Some(((index % columns) as u16, (index / columns) as u16))
    }
}

/// Resolve the grid for `tile_count` tiles and the occupied large slots.
///
/// Never fails: degenerate inputs (no tiles, a single column) are widened so
/// every span covers at least one cell.
pub fn resolve(tile_count: usize, has_presenter: bool, has_pinned: bool) -> GridGeometry {
    let edge = calculate_grid_size(tile_count);

    match (has_presenter, has_pinned) {
        (false, false) => GridGeometry {
            columns: edge,
            rows: edge,
            presenter: None,
            pinned: None,
            strip_row: None,
        },
        (true, true) => {
            let columns = edge.max(2);
            let split = columns.div_ceil(2);
            GridGeometry {
                columns,
                rows: 3,
                presenter: Some(CellSpan::new(0..split, 0..1)),
                pinned: Some(CellSpan::new(split..columns, 1..2)),
                strip_row: Some(2),
            }
        }
        (presenter, _) => {
            let rows = edge.max(2);
            let span = CellSpan::new(0..edge, 0..rows - 1);
            GridGeometry {
                columns: edge,
                rows,
                presenter: presenter.then_some(span),
                pinned: (!presenter).then_some(span),
                strip_row: Some(rows - 1),
            }
        }
    }
}
