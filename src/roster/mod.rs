//! Roster module orchestrator.
//!
//! Holds the tile data model and the store that bounds the upstream source to
//! the configured visible count.

mod core;
mod tile;

pub use self::core::{DEFAULT_VISIBLE_COUNT, RosterStore, VISIBLE_COUNT_PRESETS};
pub use tile::{Tile, TileId};
