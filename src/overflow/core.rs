use serde::{Deserialize, Serialize};

use crate::roster::Tile;

/// Split of the non-selected tiles into the bounded strip and the rest.
///
/// `visible` followed by `overflow` is always the input sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverflowPartition {
    pub visible: Vec<Tile>,
    pub overflow: Vec<Tile>,
}

impl OverflowPartition {
    /// Whether a "more" affordance must be shown.
    pub fn has_more(&self) -> bool {
        !self.overflow.is_empty()
    }

    pub fn hidden_count(&self) -> usize {
        self.overflow.len()
    }

    pub fn len(&self) -> usize {
        self.visible.len() + self.overflow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bound `others` to `capacity` strip slots.
///
/// When everything fits, nothing overflows. Otherwise one slot goes to the
/// "more" affordance, so at most `capacity - 1` tiles stay visible; with a
/// capacity of zero or one the visible strip is empty.
pub fn partition(others: &[Tile], capacity: usize) -> OverflowPartition {
    if others.len() <= capacity {
        return OverflowPartition {
            visible: others.to_vec(),
            overflow: Vec::new(),
        };
    }

    let (visible, overflow) = others.split_at(capacity.saturating_sub(1));
    OverflowPartition {
        visible: visible.to_vec(),
        overflow: overflow.to_vec(),
    }
}

/// What the strip area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripView {
    Bounded(OverflowPartition),
    /// Expanded list: every non-selected tile, capacity ignored.
    Expanded(Vec<Tile>),
}

impl StripView {
    pub fn is_expanded(&self) -> bool {
        matches!(self, StripView::Expanded(_))
    }
}

pub fn strip_view(others: &[Tile], capacity: usize, expanded: bool) -> StripView {
    if expanded {
        StripView::Expanded(others.to_vec())
    } else {
        StripView::Bounded(partition(others, capacity))
    }
}

/// Cell metrics of one strip slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripMetrics {
    pub tile_width: u16,
    pub gap: u16,
    pub height: u16,
}

impl Default for StripMetrics {
    fn default() -> Self {
        Self {
            tile_width: 16,
            gap: 1,
            height: 5,
        }
    }
}

/// Number of strip slots that fit into `extent` cells.
pub fn strip_capacity(extent: u16, metrics: &StripMetrics) -> usize {
    let pitch = u32::from(metrics.tile_width.max(1)) + u32::from(metrics.gap);
    ((u32::from(extent) + u32::from(metrics.gap)) / pitch) as usize
}
