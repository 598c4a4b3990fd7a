use serde::Serialize;

use crate::geometry::Size;
use crate::grid::{GridGeometry, LayoutMode, resolve};
use crate::overflow::{StripMetrics, StripView, strip_capacity, strip_view};
use crate::roster::{Tile, TileId};
use crate::selection::SelectionState;

/// Where a tile ends up in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileRole {
    Presenter,
    Pinned,
    /// Ordinary cell of the plain grid.
    Grid,
    /// Shown in the strip, or in the expanded list when it is open.
    Strip,
    /// Hidden behind the "more" affordance.
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedTile {
    pub tile: Tile,
    pub role: TileRole,
}

/// "+N more" entry that opens the expanded list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoreAffordance {
    pub hidden: usize,
}

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutFrame {
    pub geometry: GridGeometry,
    /// Large tiles first, then the remaining tiles in roster order.
    pub tiles: Vec<PlacedTile>,
    pub more: Option<MoreAffordance>,
    pub expanded: bool,
    pub strip_capacity: usize,
    /// Slot metrics the capacity was computed with; renderers lay the strip
    /// out on the same pitch.
    pub strip: StripMetrics,
    pub viewport: Size,
}

impl LayoutFrame {
    pub fn mode(&self) -> LayoutMode {
        self.geometry.mode()
    }

    pub fn with_role(&self, role: TileRole) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles
            .iter()
            .filter(move |placed| placed.role == role)
            .map(|placed| &placed.tile)
    }

    pub fn ids_with_role(&self, role: TileRole) -> Vec<&TileId> {
        self.with_role(role).map(|tile| &tile.id).collect()
    }

    pub fn presenter(&self) -> Option<&Tile> {
        self.with_role(TileRole::Presenter).next()
    }

    pub fn pinned(&self) -> Option<&Tile> {
        self.with_role(TileRole::Pinned).next()
    }

    pub fn role_of(&self, id: &TileId) -> Option<TileRole> {
        self.tiles
            .iter()
            .find(|placed| &placed.tile.id == id)
            .map(|placed| placed.role)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Hash of the serialized frame, used to skip re-rendering identical
    /// frames. Every field a renderer can see takes part, tile media
    /// sources and presenter hints included.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        // Frames hold only strings, integers and enums; serializing them into
        // an in-memory hasher cannot fail.
        let _ = serde_json::to_writer(&mut hasher, self);
        hasher.finalize()
    }
}

/// Pure layout pipeline: roster + selection + expanded flag + viewport → frame.
///
/// Selection entries that do not resolve to a roster tile are treated as
/// empty slots.
pub fn compose_frame(
    tiles: &[Tile],
    selection: &SelectionState,
    expanded: bool,
    viewport: Size,
    strip: &StripMetrics,
) -> LayoutFrame {
    let large = selection.large_slots(tiles);
    let (presenter, pinned) = (large.presenter, large.pinned);

    let geometry = resolve(tiles.len(), presenter.is_some(), pinned.is_some());
    let capacity = strip_capacity(viewport.width, strip);

    let mut placed = Vec::with_capacity(tiles.len());
    placed.extend(presenter.map(|tile| PlacedTile {
        tile: tile.clone(),
        role: TileRole::Presenter,
    }));
    placed.extend(pinned.map(|tile| PlacedTile {
        tile: tile.clone(),
        role: TileRole::Pinned,
    }));

    let others: Vec<Tile> = tiles
        .iter()
        .filter(|tile| !large.contains(&tile.id))
        .cloned()
        .collect();

    let more = if geometry.has_large_view() {
        match strip_view(&others, capacity, expanded) {
            StripView::Expanded(all) => {
                placed.extend(all.into_iter().map(|tile| PlacedTile {
                    tile,
                    role: TileRole::Strip,
                }));
                None
            }
            StripView::Bounded(partition) => {
                let hidden = partition.hidden_count();
                placed.extend(partition.visible.into_iter().map(|tile| PlacedTile {
                    tile,
                    role: TileRole::Strip,
                }));
                placed.extend(partition.overflow.into_iter().map(|tile| PlacedTile {
                    tile,
                    role: TileRole::Overflow,
                }));
                (hidden > 0).then_some(MoreAffordance { hidden })
            }
        }
    } else {
        let cells = geometry.grid_cells();
        let hidden = others.len().saturating_sub(cells);
        placed.extend(others.into_iter().enumerate().map(|(index, tile)| {
            let role = match (index < cells, expanded) {
                (true, _) => TileRole::Grid,
                (false, true) => TileRole::Strip,
                (false, false) => TileRole::Overflow,
            };
            PlacedTile { tile, role }
        }));
        (hidden > 0 && !expanded).then_some(MoreAffordance { hidden })
    };

    LayoutFrame {
        geometry,
        tiles: placed,
        more,
        expanded,
        strip_capacity: capacity,
        strip: *strip,
        viewport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(count: usize) -> Vec<Tile> {
        (1..=count)
            .map(|i| Tile::new(format!("video-{i}"), format!("Participant {i}")))
            .collect()
    }

    fn id(raw: &str) -> TileId {
        TileId::from(raw)
    }

    fn wide() -> Size {
        // 5 strip slots with the default 16+1 pitch.
        Size::new(84, 30)
    }

    #[test]
    fn plain_grid_places_every_tile() {
        let frame = compose_frame(
            &tiles(8),
            &SelectionState::new(),
            false,
            wide(),
            &StripMetrics::default(),
        );
        assert_eq!(frame.mode(), LayoutMode::Grid);
        assert_eq!(frame.geometry.columns, 4);
        assert_eq!(frame.with_role(TileRole::Grid).count(), 8);
        assert!(frame.more.is_none());
    }

    #[test]
    fn presenter_view_bounds_strip() {
        let mut selection = SelectionState::new();
        selection.toggle_presenter(&id("video-2"));
        let frame = compose_frame(&tiles(20), &selection, false, wide(), &StripMetrics::default());

        assert_eq!(frame.strip_capacity, 5);
        assert_eq!(frame.geometry.columns, 6);
        assert_eq!(frame.presenter().unwrap().id, id("video-2"));
        assert_eq!(frame.with_role(TileRole::Strip).count(), 4);
        assert_eq!(frame.with_role(TileRole::Overflow).count(), 15);
        assert_eq!(frame.more, Some(MoreAffordance { hidden: 15 }));
        assert_eq!(frame.tiles.len(), 20);
    }

    #[test]
    fn expanded_list_reveals_every_other_tile() {
        let mut selection = SelectionState::new();
        selection.toggle_presenter(&id("video-1"));
        let frame = compose_frame(&tiles(20), &selection, true, wide(), &StripMetrics::default());
        assert_eq!(frame.with_role(TileRole::Strip).count(), 19);
        assert_eq!(frame.with_role(TileRole::Overflow).count(), 0);
        assert!(frame.more.is_none());
        assert!(frame.expanded);
    }

    #[test]
    fn dual_view_orders_large_tiles_first() {
        let mut selection = SelectionState::new();
        selection.toggle_presenter(&id("video-3"));
        selection.toggle_pinned(&id("video-7"));
        let frame = compose_frame(&tiles(10), &selection, false, wide(), &StripMetrics::default());

        assert_eq!(frame.mode(), LayoutMode::Dual);
        assert_eq!(frame.tiles[0].role, TileRole::Presenter);
        assert_eq!(frame.tiles[1].role, TileRole::Pinned);
        assert_eq!(frame.tiles[1].tile.id, id("video-7"));
        let others: Vec<_> = frame.tiles[2..].iter().map(|p| p.tile.id.as_str()).collect();
        assert_eq!(others.len(), 8);
        assert_eq!(others[0], "video-1");
        assert_eq!(others[2], "video-4");
    }

    #[test]
    fn dangling_selection_is_treated_as_empty() {
        let mut selection = SelectionState::new();
        selection.toggle_pinned(&id("gone"));
        let frame = compose_frame(&tiles(3), &selection, false, wide(), &StripMetrics::default());
        assert_eq!(frame.mode(), LayoutMode::Grid);
        assert!(frame.pinned().is_none());
    }

    #[test]
    fn grid_beyond_capacity_overflows_until_expanded() {
        let metrics = StripMetrics::default();
        let collapsed = compose_frame(&tiles(40), &SelectionState::new(), false, wide(), &metrics);
        assert_eq!(collapsed.with_role(TileRole::Grid).count(), 36);
        assert_eq!(collapsed.more, Some(MoreAffordance { hidden: 4 }));

        let expanded = compose_frame(&tiles(40), &SelectionState::new(), true, wide(), &metrics);
        assert_eq!(expanded.with_role(TileRole::Strip).count(), 4);
        assert!(expanded.more.is_none());
    }

    #[test]
    fn fingerprint_tracks_visible_changes() {
        let metrics = StripMetrics::default();
        let base = compose_frame(&tiles(6), &SelectionState::new(), false, wide(), &metrics);
        let same = compose_frame(&tiles(6), &SelectionState::new(), false, wide(), &metrics);
        assert_eq!(base.fingerprint(), same.fingerprint());

        let resized = compose_frame(
            &tiles(6),
            &SelectionState::new(),
            false,
            Size::new(40, 20),
            &metrics,
        );
        assert_ne!(base.fingerprint(), resized.fingerprint());
    }

    #[test]
    fn fingerprint_covers_tile_media_and_hints() {
        let metrics = StripMetrics::default();
        let compose = |tile: Tile| {
            compose_frame(&[tile], &SelectionState::new(), false, wide(), &metrics)
        };
        let one = compose(Tile::new("a", "Alice").with_media_source("rtsp://one"));
        let two = compose(Tile::new("a", "Alice").with_media_source("rtsp://two"));
        let hinted = compose(
            Tile::new("a", "Alice")
                .with_media_source("rtsp://one")
                .with_presenter_hint(true),
        );

        assert_ne!(one.fingerprint(), two.fingerprint());
        assert_ne!(one.fingerprint(), hinted.fingerprint());
    }

    #[test]
    fn frame_serializes_roles_in_lowercase() {
        let mut selection = SelectionState::new();
        selection.toggle_pinned(&id("video-1"));
        let frame = compose_frame(&tiles(2), &selection, false, wide(), &StripMetrics::default());
        let json = frame.to_json().unwrap();
        assert!(json.contains("\"role\":\"pinned\""));
        assert!(json.contains("\"role\":\"strip\""));
    }
}
