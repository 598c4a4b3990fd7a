use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a tile. Selection refers to tiles only through this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TileId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single participant's renderable unit.
///
/// `presenter_hint` mirrors the upstream "is presenter" flag. It is advisory:
/// the engine only promotes a hinted tile when asked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_source: Option<String>,
    #[serde(default)]
    pub presenter_hint: bool,
}

impl Tile {
    pub fn new(id: impl Into<TileId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            media_source: None,
            presenter_hint: false,
        }
    }

    pub fn with_media_source(mut self, source: impl Into<String>) -> Self {
        self.media_source = Some(source.into());
        self
    }

    pub fn with_presenter_hint(mut self, hint: bool) -> Self {
        self.presenter_hint = hint;
        self
    }
}
