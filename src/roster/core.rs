use std::collections::HashSet;

use super::tile::{Tile, TileId};

/// Visible-count choices offered by the stock control panel.
pub const VISIBLE_COUNT_PRESETS: [usize; 7] = [1, 2, 4, 8, 12, 16, 20];

pub const DEFAULT_VISIBLE_COUNT: usize = 16;

/// Ordered candidate tiles bounded to a visible-count limit.
///
/// The upstream source is kept intact so that raising the limit later brings
/// back tiles that were cut off. The effective roster is always rebuilt from
/// scratch, never patched.
#[derive(Debug, Clone)]
pub struct RosterStore {
    source: Vec<Tile>,
    visible_count: usize,
    tiles: Vec<Tile>,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBLE_COUNT)
    }
}

impl RosterStore {
    pub fn new(visible_count: usize) -> Self {
        Self {
            source: Vec::new(),
            visible_count: visible_count.max(1),
            tiles: Vec::new(),
        }
    }

    /// Install a new upstream source. Returns whether the effective roster changed.
    pub fn replace_source(&mut self, tiles: Vec<Tile>) -> bool {
        self.source = tiles;
        self.rebuild()
    }

    /// Set the visible-count limit; zero is clamped to one.
    /// Returns whether the effective roster changed.
    pub fn set_visible_count(&mut self, count: usize) -> bool {
        self.visible_count = count.max(1);
        self.rebuild()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| &tile.id == id)
    }

    pub fn contains(&self, id: &TileId) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &TileId) -> Option<usize> {
        self.tiles.iter().position(|tile| &tile.id == id)
    }

    fn rebuild(&mut self) -> bool {
        let mut seen = HashSet::new();
        let next: Vec<Tile> = self
            .source
            .iter()
            .filter(|tile| seen.insert(tile.id.clone()))
            .take(self.visible_count)
            .cloned()
            .collect();

        let changed = next != self.tiles;
        self.tiles = next;
        changed
    }
}
