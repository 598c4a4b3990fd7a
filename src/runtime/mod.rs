use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::json;

use crate::engine::{PinBoardEngine, TileEvent, TileRole};
use crate::error::{PinboardError, Result};
use crate::geometry::Size;
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::render::AnsiRenderer;
use crate::roster::{Tile, TileId, VISIBLE_COUNT_PRESETS};

pub mod driver;

const LOG_TARGET: &str = "pinboard::runtime";

/// Configuration knobs for the runtime loop.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            metrics_interval: Duration::from_secs(5),
        }
    }
}

/// Events the runtime feeds into the engine.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Resize(Size),
    Tile(TileEvent),
    Roster(Vec<Tile>),
}

/// Terminal host loop around a [`PinBoardEngine`].
///
/// Keyboard focus walks the tiles that are on screen; `p` and `s` toggle the
/// focused tile on the pin and presenter axes.
pub struct BoardRuntime {
    engine: PinBoardEngine,
    renderer: AnsiRenderer,
    config: RuntimeConfig,
    focus: Option<TileId>,
    focus_dirty: bool,
    should_exit: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl BoardRuntime {
    pub fn new(engine: PinBoardEngine, renderer: AnsiRenderer) -> Self {
        Self {
            engine,
            renderer,
            config: RuntimeConfig::default(),
            focus: None,
            focus_dirty: false,
            should_exit: false,
            start_instant: None,
            last_metrics_emit: None,
        }
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn engine(&self) -> &PinBoardEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PinBoardEngine {
        &mut self.engine
    }

    pub fn focus(&self) -> Option<&TileId> {
        self.focus.as_ref()
    }

    /// Drive the board from live terminal input until an exit key is pressed.
    ///
    /// Resizes go through the engine's settle window; everything else is
    /// applied immediately.
    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout).map_err(terminal_error)? {
                let raw = event::read().map_err(terminal_error)?;
                if let Some(runtime_event) = self.map_event(raw) {
                    self.dispatch_event(runtime_event);
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(RuntimeEvent::Tick { elapsed });
            }

            self.engine.poll_viewport(Instant::now());
            self.render_if_changed(stdout)?;
            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Replay a fixed event sequence. Resizes are applied without settling.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events {
            match event {
                RuntimeEvent::Resize(size) => {
                    self.engine.resize_now(size);
                }
                other => self.dispatch_event(other),
            }
            self.render_if_changed(stdout)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    fn map_event(&mut self, event: CrosstermEvent) -> Option<RuntimeEvent> {
        match event {
            CrosstermEvent::Key(key) => Some(RuntimeEvent::Key(key)),
            CrosstermEvent::Resize(width, height) => {
                self.engine
                    .observe_viewport(Size::new(width, height), Instant::now());
                None
            }
            _ => None,
        }
    }

    fn dispatch_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Tick { .. } => {}
            RuntimeEvent::Key(key) => self.handle_key(key),
            RuntimeEvent::Resize(size) => {
                self.engine.observe_viewport(size, Instant::now());
            }
            RuntimeEvent::Tile(tile_event) => {
                self.engine.apply(&tile_event);
            }
            RuntimeEvent::Roster(tiles) => self.engine.replace_source(tiles),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_exit();
            }
            KeyCode::Char('q') | KeyCode::Esc => self.request_exit(),
            KeyCode::Right | KeyCode::Tab => self.move_focus(1),
            KeyCode::Left | KeyCode::BackTab => self.move_focus(-1),
            KeyCode::Char('p') => {
                if let Some(id) = self.focused_tile() {
                    self.engine.toggle_pinned(&id);
                }
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.focused_tile() {
                    self.engine.toggle_presenter(&id);
                }
            }
            KeyCode::Char('a') => {
                self.engine.present_hinted();
            }
            KeyCode::Char('e') => {
                self.engine.toggle_expanded();
            }
            KeyCode::Char('+') => self.step_visible_count(true),
            KeyCode::Char('-') => self.step_visible_count(false),
            _ => {}
        }
    }

    /// Tiles the user can currently see, in frame order.
    fn focusable(&self) -> Vec<TileId> {
        self.engine
            .frame()
            .tiles
            .iter()
            .filter(|placed| placed.role != TileRole::Overflow)
            .map(|placed| placed.tile.id.clone())
            .collect()
    }

    fn focused_tile(&mut self) -> Option<TileId> {
        let focusable = self.focusable();
        let current = self
            .focus
            .as_ref()
            .filter(|id| focusable.contains(id))
            .cloned()
            .or_else(|| focusable.first().cloned());
        if current != self.focus {
            self.focus = current.clone();
            self.focus_dirty = true;
        }
        current
    }

    fn move_focus(&mut self, step: isize) {
        let focusable = self.focusable();
        if focusable.is_empty() {
            return;
        }
        let len = focusable.len() as isize;
        let next = match self.focus.as_ref().and_then(|id| focusable.iter().position(|f| f == id)) {
            Some(index) => (index as isize + step).rem_euclid(len) as usize,
            None => 0,
        };
        self.focus = Some(focusable[next].clone());
        self.focus_dirty = true;
    }

    fn step_visible_count(&mut self, up: bool) {
        let current = self.engine.roster().visible_count();
        let next = if up {
            VISIBLE_COUNT_PRESETS.iter().copied().find(|preset| *preset > current)
        } else {
            VISIBLE_COUNT_PRESETS.iter().rev().copied().find(|preset| *preset < current)
        };
        if let Some(count) = next {
            self.engine.set_visible_count(count);
        }
    }

    fn request_exit(&mut self) {
        self.should_exit = true;
        self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
    }

    fn render_if_changed(&mut self, stdout: &mut impl Write) -> Result<()> {
        let frame_changed = self.engine.take_frame_if_changed().is_some();
        // Keeps focus on a tile that is still on screen.
        self.focused_tile();
        if !frame_changed && !self.focus_dirty {
            return Ok(());
        }
        self.focus_dirty = false;

        let frame = self.engine.frame();
        self.renderer.render(stdout, frame, self.focus.as_ref())?;
        self.log_runtime_event(
            LogLevel::Debug,
            "render_completed",
            [
                json_kv("tiles", json!(frame.tiles.len())),
                json_kv("frame_changed", json!(frame_changed)),
            ],
        );
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("tiles", json!(self.engine.roster().len())),
                json_kv("width", json!(self.engine.viewport_size().width)),
                json_kv("height", json!(self.engine.viewport_size().height)),
            ],
        );
        self.render_if_changed(stdout)
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms as u64))],
        );
        self.engine.emit_metrics();
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics_interval.is_zero() {
            return;
        }
        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }
        self.engine.emit_metrics();
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.engine.config().logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

fn terminal_error(err: std::io::Error) -> PinboardError {
    PinboardError::Terminal(err.to_string())
}
