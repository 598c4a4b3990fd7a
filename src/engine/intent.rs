use serde::{Deserialize, Serialize};

use crate::roster::TileId;

/// What a renderer asks for when a tile control is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileIntent {
    Pin,
    Unpin,
    Present,
    Unpresent,
    ToggleExpanded,
}

/// Renderer → engine event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEvent {
    pub tile_id: TileId,
    pub intent: TileIntent,
}

impl TileEvent {
    pub fn new(tile_id: impl Into<TileId>, intent: TileIntent) -> Self {
        Self {
            tile_id: tile_id.into(),
            intent,
        }
    }
}
