use std::io::Write;

use crate::error::Result;
use crate::engine::{LayoutFrame, TileRole};
use crate::geometry::Rect;
use crate::roster::{Tile, TileId};
use crate::width::{display_width, truncate_to_width};

/// Renderer runtime parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Gap between grid tracks, in cells.
    pub gap: u16,
    pub restore_cursor: Option<(u16, u16)>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            gap: 1,
            restore_cursor: None,
        }
    }
}

/// ANSI escape code renderer writing directly to a terminal handle.
pub struct AnsiRenderer {
    settings: RendererSettings,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    /// Draw a full frame; `focus` gets a heavy border.
    pub fn render(
        &mut self,
        writer: &mut impl Write,
        frame: &LayoutFrame,
        focus: Option<&TileId>,
    ) -> Result<()> {
        write!(writer, "\x1b[2J")?;

        let area = Rect::new(0, 0, frame.viewport.width, frame.viewport.height);
        let slots = frame
            .geometry
            .slot_rects(area, frame.strip.height, self.settings.gap);

        if let (Some(rect), Some(tile)) = (slots.presenter, frame.presenter()) {
            draw_tile(writer, rect, tile, Some("presenting"), focus)?;
        }
        if let (Some(rect), Some(tile)) = (slots.pinned, frame.pinned()) {
            draw_tile(writer, rect, tile, Some("pinned"), focus)?;
        }
        for (rect, tile) in slots.cells.iter().zip(frame.with_role(TileRole::Grid)) {
            draw_tile(writer, *rect, tile, None, focus)?;
        }

        if frame.expanded {
            let listed: Vec<&Tile> = frame.with_role(TileRole::Strip).collect();
            if !listed.is_empty() {
                let width = (area.width / 3)
                    .max(frame.strip.tile_width.saturating_add(2))
                    .min(area.width);
                let panel = Rect::new(area.width - width, 0, width, area.height);
                draw_list(writer, panel, &listed, focus)?;
            }
        } else if let Some(strip) = slots.strip {
            self.draw_strip(writer, strip, frame, focus)?;
        } else if let Some(more) = frame.more {
            // Plain grid past its cell budget: no strip row to host the box.
            let label = format!("+{} more", more.hidden);
            let col = area.width.saturating_sub(display_width(&label) as u16);
            write!(writer, "{}{}", move_to(area.height.saturating_sub(1), col), label)?;
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            write!(writer, "{}", move_to(row, col))?;
        }

        writer.flush()?;
        Ok(())
    }

    fn draw_strip(
        &self,
        writer: &mut impl Write,
        strip: Rect,
        frame: &LayoutFrame,
        focus: Option<&TileId>,
    ) -> Result<()> {
        let metrics = frame.strip;
        let tile_width = metrics.tile_width.max(1);
        let pitch = tile_width.saturating_add(metrics.gap);
        // Slots that would spill past the strip are not drawn.
        let slot = |index: u16| {
            let rect = Rect::new(
                strip.x.saturating_add(index.saturating_mul(pitch)),
                strip.y,
                tile_width,
                strip.height,
            );
            (rect.right() <= strip.right()).then_some(rect)
        };

        let mut index = 0u16;
        for tile in frame.with_role(TileRole::Strip) {
            if let Some(rect) = slot(index) {
                draw_tile(writer, rect, tile, None, focus)?;
            }
            index = index.saturating_add(1);
        }
        if let (Some(more), Some(rect)) = (frame.more, slot(index)) {
            draw_box(writer, rect, &format!("+{} more", more.hidden), false)?;
        }
        Ok(())
    }
}

fn draw_tile(
    writer: &mut impl Write,
    rect: Rect,
    tile: &Tile,
    badge: Option<&str>,
    focus: Option<&TileId>,
) -> Result<()> {
    let focused = focus == Some(&tile.id);
    draw_box(writer, rect, &tile.display_name, focused)?;

    let inner = rect.inset(1);
    if let Some(badge) = badge {
        if inner.height > 0 && inner.width > 0 {
            let label = truncate_to_width(&format!("[{badge}]"), inner.width as usize);
            write!(writer, "{}{}", move_to(inner.y, inner.x), label)?;
        }
    }
    Ok(())
}

fn draw_list(
    writer: &mut impl Write,
    panel: Rect,
    tiles: &[&Tile],
    focus: Option<&TileId>,
) -> Result<()> {
    draw_box(writer, panel, &format!("All participants ({})", tiles.len()), false)?;
    let inner = panel.inset(1);
    for (offset, tile) in tiles.iter().take(inner.height as usize).enumerate() {
        let marker = if focus == Some(&tile.id) { '>' } else { ' ' };
        let line = truncate_to_width(
            &format!("{marker} {}", tile.display_name),
            inner.width as usize,
        );
        write!(
            writer,
            "{}{}",
            move_to(inner.y + offset as u16, inner.x),
            line
        )?;
    }
    Ok(())
}

fn draw_box(writer: &mut impl Write, rect: Rect, title: &str, heavy: bool) -> Result<()> {
    if rect.width < 2 || rect.height < 2 {
        return Ok(());
    }
    let (h, v, tl, tr, bl, br) = if heavy {
        ('━', '┃', '┏', '┓', '┗', '┛')
    } else {
        ('─', '│', '┌', '┐', '└', '┘')
    };

    let inner_width = (rect.width - 2) as usize;
    let label = truncate_to_width(title, inner_width);
    let mut top = String::new();
    top.push(tl);
    top.push_str(&label);
    top.extend(std::iter::repeat_n(h, inner_width - display_width(&label)));
    top.push(tr);
    write!(writer, "{}{}", move_to(rect.y, rect.x), top)?;

    for row in rect.y + 1..rect.bottom() - 1 {
        write!(writer, "{}{}", move_to(row, rect.x), v)?;
        write!(writer, "{}{}", move_to(row, rect.right() - 1), v)?;
    }

    let mut bottom = String::new();
    bottom.push(bl);
    bottom.extend(std::iter::repeat_n(h, inner_width));
    bottom.push(br);
    write!(writer, "{}{}", move_to(rect.bottom() - 1, rect.x), bottom)?;
    Ok(())
}

/// Cursor move to a zero-based cell.
fn move_to(row: u16, col: u16) -> String {
    format!("\x1b[{};{}H", row + 1, col + 1)
}
