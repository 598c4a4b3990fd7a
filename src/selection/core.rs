use serde::{Deserialize, Serialize};

use crate::roster::{RosterStore, Tile, TileId};

/// The two independent selection axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Presenter,
    Pinned,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Presenter => "presenter",
            Axis::Pinned => "pinned",
        }
    }
}

/// Which axes a host exposes. A disabled axis ignores every intent aimed at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionAxes {
    pub presenter: bool,
    pub pin: bool,
}

impl Default for SelectionAxes {
    fn default() -> Self {
        Self {
            presenter: true,
            pin: true,
        }
    }
}

impl SelectionAxes {
    pub fn presenter_only() -> Self {
        Self {
            presenter: true,
            pin: false,
        }
    }

    pub fn pin_only() -> Self {
        Self {
            presenter: false,
            pin: true,
        }
    }

    pub fn allows(&self, axis: Axis) -> bool {
        match axis {
            Axis::Presenter => self.presenter,
            Axis::Pinned => self.pin,
        }
    }
}

/// Outcome of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// `tile` now occupies `axis`; `replaced` held it before.
    Selected {
        axis: Axis,
        tile: TileId,
        replaced: Option<TileId>,
    },
    /// `tile` no longer occupies `axis`.
    Cleared { axis: Axis, tile: TileId },
}

impl SelectionChange {
    pub fn axis(&self) -> Axis {
        match self {
            SelectionChange::Selected { axis, .. } | SelectionChange::Cleared { axis, .. } => *axis,
        }
    }

    pub fn tile(&self) -> &TileId {
        match self {
            SelectionChange::Selected { tile, .. } | SelectionChange::Cleared { tile, .. } => tile,
        }
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, SelectionChange::Cleared { .. })
    }
}

/// Identifiers dropped by [`SelectionState::repair`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub presenter: Option<TileId>,
    pub pinned: Option<TileId>,
}

impl RepairReport {
    pub fn is_empty(&self) -> bool {
        self.presenter.is_none() && self.pinned.is_none()
    }

    pub fn count(&self) -> usize {
        usize::from(self.presenter.is_some()) + usize::from(self.pinned.is_some())
    }
}

/// Large slots that are actually occupied, resolved against the tiles on
/// the board. Selections that point at no tile leave their slot empty. A
/// tile that is both presenter and pinned fills a single slot, shown in the
/// presenter role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LargeSlots<'a> {
    pub presenter: Option<&'a Tile>,
    pub pinned: Option<&'a Tile>,
}

impl LargeSlots<'_> {
    pub fn any(&self) -> bool {
        self.presenter.is_some() || self.pinned.is_some()
    }

    pub fn count(&self) -> usize {
        usize::from(self.presenter.is_some()) + usize::from(self.pinned.is_some())
    }

    pub fn contains(&self, id: &TileId) -> bool {
        [self.presenter, self.pinned]
            .into_iter()
            .flatten()
            .any(|tile| &tile.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    presenter: Option<TileId>,
    pinned: Option<TileId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presenter(&self) -> Option<&TileId> {
        self.presenter.as_ref()
    }

    pub fn pinned(&self) -> Option<&TileId> {
        self.pinned.as_ref()
    }

    pub fn get(&self, axis: Axis) -> Option<&TileId> {
        match axis {
            Axis::Presenter => self.presenter(),
            Axis::Pinned => self.pinned(),
        }
    }

    pub fn is_selected(&self, id: &TileId) -> bool {
        self.presenter.as_ref() == Some(id) || self.pinned.as_ref() == Some(id)
    }

    pub fn toggle_pinned(&mut self, id: &TileId) -> SelectionChange {
        toggle_slot(&mut self.pinned, Axis::Pinned, id)
    }

    pub fn toggle_presenter(&mut self, id: &TileId) -> SelectionChange {
        toggle_slot(&mut self.presenter, Axis::Presenter, id)
    }

    pub fn toggle(&mut self, axis: Axis, id: &TileId) -> SelectionChange {
        match axis {
            Axis::Presenter => self.toggle_presenter(id),
            Axis::Pinned => self.toggle_pinned(id),
        }
    }

    /// Drop any reference to a tile that is no longer in `roster`.
    pub fn repair(&mut self, roster: &RosterStore) -> RepairReport {
        RepairReport {
            presenter: self.presenter.take_if(|id| !roster.contains(id)),
            pinned: self.pinned.take_if(|id| !roster.contains(id)),
        }
    }

    pub fn large_slots<'a>(&self, tiles: &'a [Tile]) -> LargeSlots<'a> {
        let lookup = |id: Option<&TileId>| id.and_then(|id| tiles.iter().find(|tile| &tile.id == id));
        let presenter = lookup(self.presenter());
        let pinned = lookup(self.pinned()).filter(|tile| Some(&tile.id) != self.presenter());
        LargeSlots { presenter, pinned }
    }
}

fn toggle_slot(slot: &mut Option<TileId>, axis: Axis, id: &TileId) -> SelectionChange {
    if slot.as_ref() == Some(id) {
        *slot = None;
        SelectionChange::Cleared {
            axis,
            tile: id.clone(),
        }
    } else {
        let replaced = slot.replace(id.clone());
        SelectionChange::Selected {
            axis,
            tile: id.clone(),
            replaced,
        }
    }
}
