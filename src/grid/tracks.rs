//! Track distribution for placing a resolved grid on a surface.
//!
//! Columns are equal flexible tracks. Rows are flexible except the strip row,
//! which asks for a fixed height and gives it up cell by cell when the surface
//! is too short.

use std::num::NonZeroU16;

use crate::geometry::Rect;

use super::core::{CellSpan, GridGeometry};

/// How a row or column claims space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Fixed size in cells.
    Fixed(u16),
    /// Proportional share of whatever the fixed tracks leave.
    Flex(NonZeroU16),
}

impl Track {
    /// Flexible track; a zero weight counts as one.
    pub fn flex(weight: u16) -> Self {
        Self::Flex(NonZeroU16::new(weight).unwrap_or(NonZeroU16::MIN))
    }
}

/// Split `total` cells across `tracks` separated by `gap`, returning
/// `(offset, length)` per track.
pub fn distribute(total: u16, gap: u16, tracks: &[Track]) -> Vec<(u16, u16)> {
    if tracks.is_empty() {
        return Vec::new();
    }

    let gaps = u32::from(gap) * (tracks.len() as u32 - 1);
    let available = u32::from(total).saturating_sub(gaps);

    let mut lengths: Vec<u32> = tracks
        .iter()
        .map(|track| match track {
            Track::Fixed(value) => u32::from(*value),
            Track::Flex(_) => 0,
        })
        .collect();

    let used: u32 = lengths.iter().sum();
    if used > available {
        shrink_fixed(&mut lengths, used - available);
    }

    let remaining = available.saturating_sub(lengths.iter().sum());
    distribute_flex(&mut lengths, tracks, remaining);

    let mut cursor = 0u32;
    lengths
        .into_iter()
        .map(|length| {
            let offset = cursor.min(u32::from(total)) as u16;
            cursor = cursor.saturating_add(length).saturating_add(u32::from(gap));
            (offset, length.min(u32::from(u16::MAX)) as u16)
        })
        .collect()
}

fn shrink_fixed(lengths: &mut [u32], mut over: u32) {
    while over > 0 {
        let mut changed = false;
        for length in lengths.iter_mut() {
            if *length > 0 {
                *length -= 1;
                over -= 1;
                changed = true;
                if over == 0 {
                    break;
                }
            }
        }

        if !changed {
            break;
        }
    }
}

fn distribute_flex(lengths: &mut [u32], tracks: &[Track], remaining: u32) {
    let weights: Vec<u32> = tracks
        .iter()
        .map(|track| match track {
            Track::Flex(weight) => u32::from(weight.get()),
            Track::Fixed(_) => 0,
        })
        .collect();
    let total_weight: u32 = weights.iter().sum();
    if total_weight == 0 || remaining == 0 {
        return;
    }

    let mut leftover = remaining;
    for (length, weight) in lengths.iter_mut().zip(&weights) {
        let share = (remaining * weight) / total_weight;
        *length += share;
        leftover -= share;
    }

    let flex_slots: Vec<usize> = weights
        .iter()
        .enumerate()
        .filter(|(_, weight)| **weight > 0)
        .map(|(idx, _)| idx)
        .collect();
    for idx in flex_slots.iter().cycle().take(leftover as usize) {
        lengths[*idx] += 1;
    }
}

/// Surface rectangles for every slot of a [`GridGeometry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotRects {
    pub presenter: Option<Rect>,
    pub pinned: Option<Rect>,
    pub strip: Option<Rect>,
    /// Plain grid cells in row-major order; empty when a large view is shown.
    pub cells: Vec<Rect>,
}

impl GridGeometry {
    /// Place the geometry inside `area`.
    pub fn slot_rects(&self, area: Rect, strip_height: u16, gap: u16) -> SlotRects {
        let columns = distribute(area.width, gap, &vec![Track::flex(1); usize::from(self.columns)]);
        let row_tracks: Vec<Track> = (0..self.rows)
            .map(|row| {
                if Some(row) == self.strip_row {
                    Track::Fixed(strip_height)
                } else {
                    Track::flex(1)
                }
            })
            .collect();
        let rows = distribute(area.height, gap, &row_tracks);

        let place = |span: CellSpan| span_rect(area, &columns, &rows, span);

        let cells = (0..self.grid_cells())
            .filter_map(|index| self.cell_position(index))
            .map(|(col, row)| place(CellSpan::new(col..col + 1, row..row + 1)))
            .collect();

        SlotRects {
            presenter: self.presenter.map(place),
            pinned: self.pinned.map(place),
            strip: self
                .strip_row
                .map(|row| place(CellSpan::new(0..self.columns, row..row + 1))),
            cells,
        }
    }
}

fn span_rect(area: Rect, columns: &[(u16, u16)], rows: &[(u16, u16)], span: CellSpan) -> Rect {
    let (x, width) = axis_extent(columns, span.col_start, span.col_end);
    let (y, height) = axis_extent(rows, span.row_start, span.row_end);
    Rect::new(
        area.x.saturating_add(x),
        area.y.saturating_add(y),
        width,
        height,
    )
}

fn axis_extent(tracks: &[(u16, u16)], start: u16, end: u16) -> (u16, u16) {
    let first = tracks.get(usize::from(start));
    let last = end
        .checked_sub(1)
        .and_then(|idx| tracks.get(usize::from(idx)));
    match (first, last) {
        (Some(&(offset, _)), Some(&(last_offset, last_len))) => {
            let far = last_offset.saturating_add(last_len);
            (offset, far.saturating_sub(offset))
        }
        _ => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::resolve;

    #[test]
    fn equal_flex_tracks_share_space() {
        let tracks = vec![Track::flex(1); 4];
        assert_eq!(
            distribute(43, 1, &tracks),
            vec![(0, 10), (11, 10), (22, 10), (33, 10)]
        );
    }

    #[test]
    fn leftover_cells_go_round_robin() {
        let tracks = vec![Track::flex(1); 3];
        let solved = distribute(11, 0, &tracks);
        let lengths: Vec<u16> = solved.iter().map(|(_, len)| *len).collect();
        assert_eq!(lengths, vec![4, 4, 3]);
    }

    #[test]
    fn fixed_track_shrinks_when_surface_is_short() {
        let tracks = [Track::flex(1), Track::Fixed(5)];
        let solved = distribute(3, 0, &tracks);
        assert_eq!(solved, vec![(0, 0), (0, 3)]);
    }

    #[test]
    fn zero_weight_flex_counts_as_one() {
        assert_eq!(Track::flex(0), Track::flex(1));
    }

    #[test]
    fn single_view_places_large_tile_above_strip() {
        let geometry = resolve(6, true, false);
        let rects = geometry.slot_rects(Rect::new(0, 0, 80, 24), 5, 0);
        let presenter = rects.presenter.unwrap();
        let strip = rects.strip.unwrap();
        assert_eq!(presenter, Rect::new(0, 0, 80, 19));
        assert_eq!(strip, Rect::new(0, 19, 80, 5));
        assert!(rects.cells.is_empty());
        assert!(rects.pinned.is_none());
    }

    #[test]
    fn dual_view_rects_do_not_overlap() {
        let geometry = resolve(10, true, true);
        let rects = geometry.slot_rects(Rect::new(0, 0, 80, 25), 5, 0);
        let presenter = rects.presenter.unwrap();
        let pinned = rects.pinned.unwrap();
        assert_eq!(presenter.x, 0);
        assert_eq!(presenter.width, 40);
        assert_eq!(pinned.x, 40);
        assert!(pinned.y >= presenter.bottom());
        assert_eq!(rects.strip.unwrap().y, pinned.bottom());
    }

    #[test]
    fn grid_mode_yields_one_rect_per_cell() {
        let geometry = resolve(3, false, false);
        let rects = geometry.slot_rects(Rect::new(2, 1, 40, 20), 5, 0);
        assert_eq!(rects.cells.len(), 4);
        assert_eq!(rects.cells[0], Rect::new(2, 1, 20, 10));
        assert_eq!(rects.cells[3], Rect::new(22, 11, 20, 10));
        assert!(rects.strip.is_none());
    }
}
