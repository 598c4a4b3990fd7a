use std::sync::Arc;
use std::time::Instant;

use serde_json::json;

use crate::geometry::Size;
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::{EngineMetrics, MetricSnapshot};
use crate::notify::{NullPinNotifier, PinNotifier};
use crate::roster::{RosterStore, Tile, TileId};
use crate::selection::{Axis, SelectionChange, SelectionState};
use crate::viewport::{ViewportFeed, ViewportTracker};

use super::config::EngineConfig;
use super::frame::{LayoutFrame, compose_frame};
use super::intent::{TileEvent, TileIntent};

const LOG_TARGET: &str = "pinboard::engine";

/// Tile layout and selection engine.
///
/// Every mutation recomputes the frame from the latest roster, selection,
/// expanded flag and viewport; the last write wins for each of them.
pub struct PinBoardEngine {
    config: EngineConfig,
    roster: RosterStore,
    selection: SelectionState,
    expanded: bool,
    viewport: ViewportTracker,
    notifier: Arc<dyn PinNotifier>,
    frame: LayoutFrame,
    last_taken: Option<blake3::Hash>,
    started_at: Instant,
}

impl PinBoardEngine {
    pub fn new(config: EngineConfig) -> Self {
        let roster = RosterStore::new(config.visible_count);
        let viewport = ViewportTracker::new(config.initial_viewport, config.viewport);
        let selection = SelectionState::new();
        let frame = compose_frame(
            roster.tiles(),
            &selection,
            false,
            viewport.current(),
            &config.strip,
        );

        let engine = Self {
            config,
            roster,
            selection,
            expanded: false,
            viewport,
            notifier: Arc::new(NullPinNotifier),
            frame,
            last_taken: None,
            started_at: Instant::now(),
        };
        engine.log(
            LogLevel::Info,
            "engine_constructed",
            [
                json_kv("visible_count", json!(engine.roster.visible_count())),
                json_kv("presenter_axis", json!(engine.config.axes.presenter)),
                json_kv("pin_axis", json!(engine.config.axes.pin)),
            ],
        );
        engine
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn PinNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport.current()
    }

    /// Producer handle for asynchronous resize notifications.
    pub fn viewport_feed(&self) -> ViewportFeed {
        self.viewport.feed()
    }

    pub fn frame(&self) -> &LayoutFrame {
        &self.frame
    }

    /// Return the current frame only if it differs from the last one taken.
    pub fn take_frame_if_changed(&mut self) -> Option<&LayoutFrame> {
        let fingerprint = self.frame.fingerprint();
        if self.last_taken == Some(fingerprint) {
            return None;
        }
        self.last_taken = Some(fingerprint);
        Some(&self.frame)
    }

    // ---- roster -------------------------------------------------------

    pub fn replace_source(&mut self, tiles: Vec<Tile>) {
        let offered = tiles.len();
        let changed = self.roster.replace_source(tiles);
        self.with_metrics(EngineMetrics::record_roster_replacement);
        self.log(
            LogLevel::Info,
            "roster_replaced",
            [
                json_kv("offered", json!(offered)),
                json_kv("admitted", json!(self.roster.len())),
                json_kv("changed", json!(changed)),
            ],
        );
        self.recompute("roster_replaced");
    }

    pub fn set_visible_count(&mut self, count: usize) {
        let changed = self.roster.set_visible_count(count);
        self.log(
            LogLevel::Info,
            "visible_count_changed",
            [
                json_kv("requested", json!(count)),
                json_kv("effective", json!(self.roster.visible_count())),
                json_kv("changed", json!(changed)),
            ],
        );
        self.recompute("visible_count_changed");
    }

    // ---- selection ----------------------------------------------------

    pub fn toggle_pinned(&mut self, id: &TileId) -> Option<SelectionChange> {
        self.toggle(Axis::Pinned, id)
    }

    pub fn toggle_presenter(&mut self, id: &TileId) -> Option<SelectionChange> {
        self.toggle(Axis::Presenter, id)
    }

    /// Promote the first tile flagged upstream as presenter, if the presenter
    /// slot is free.
    pub fn present_hinted(&mut self) -> Option<SelectionChange> {
        if !self.config.axes.presenter || self.selection.presenter().is_some() {
            return None;
        }
        let id = self
            .roster
            .tiles()
            .iter()
            .find(|tile| tile.presenter_hint)?
            .id
            .clone();
        self.toggle(Axis::Presenter, &id)
    }

    /// Route a renderer event. Explicit intents that would not change the
    /// selection (pinning the pinned tile, unpinning another) are no-ops.
    pub fn apply(&mut self, event: &TileEvent) -> Option<SelectionChange> {
        let id = &event.tile_id;
        let pinned = self.selection.pinned() == Some(id);
        let presenting = self.selection.presenter() == Some(id);
        match event.intent {
            TileIntent::Pin if !pinned => self.toggle(Axis::Pinned, id),
            TileIntent::Unpin if pinned => self.toggle(Axis::Pinned, id),
            TileIntent::Present if !presenting => self.toggle(Axis::Presenter, id),
            TileIntent::Unpresent if presenting => self.toggle(Axis::Presenter, id),
            TileIntent::ToggleExpanded => {
                self.toggle_expanded();
                None
            }
            _ => None,
        }
    }

    // ---- expanded list ------------------------------------------------

    /// Returns whether the mode changed.
    pub fn set_expanded(&mut self, expanded: bool) -> bool {
        if self.expanded == expanded {
            return false;
        }
        self.mark_expanded(expanded, "requested");
        self.recompute("expanded_toggled");
        true
    }

    /// Flip the expanded list, returning the new state.
    pub fn toggle_expanded(&mut self) -> bool {
        self.set_expanded(!self.expanded);
        self.expanded
    }

    // ---- viewport -----------------------------------------------------

    /// Stage a resize observed on the engine's own thread.
    pub fn observe_viewport(&mut self, size: Size, at: Instant) {
        self.viewport.observe(size, at);
    }

    /// Publish a settled resize, if any. Returns whether the frame was recomputed.
    pub fn poll_viewport(&mut self, now: Instant) -> bool {
        match self.viewport.poll(now) {
            Some(size) => {
                self.viewport_applied(size);
                true
            }
            None => false,
        }
    }

    /// Apply a size right away, for hosts that already debounce.
    pub fn resize_now(&mut self, size: Size) -> bool {
        match self.viewport.apply(size) {
            Some(size) => {
                self.viewport_applied(size);
                true
            }
            None => false,
        }
    }

    // ---- metrics ------------------------------------------------------

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.started_at.elapsed()))
    }

    /// Push a metrics snapshot through the configured logger.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
    }

    // ---- internals ----------------------------------------------------

    fn toggle(&mut self, axis: Axis, id: &TileId) -> Option<SelectionChange> {
        if !self.config.axes.allows(axis) {
            self.log_ignored(axis, id, "axis_disabled");
            return None;
        }
        let Some(tile) = self.roster.get(id).cloned() else {
            self.log_ignored(axis, id, "unknown_tile");
            return None;
        };

        let change = self.selection.toggle(axis, id);
        if change.is_cleared() {
            self.mark_expanded(false, "selection_cleared");
        }
        if axis == Axis::Pinned {
            if change.is_cleared() {
                self.notifier.on_video_unpin(&tile);
            } else {
                self.notifier.on_video_pin(&tile);
            }
        }

        self.with_metrics(EngineMetrics::record_selection_change);
        self.log(
            LogLevel::Info,
            "selection_changed",
            [
                json_kv("axis", json!(axis.as_str())),
                json_kv("tile", json!(id.as_str())),
                json_kv("cleared", json!(change.is_cleared())),
            ],
        );
        self.recompute("selection_changed");
        Some(change)
    }

    fn viewport_applied(&mut self, size: Size) {
        let coalesced = self.viewport.take_coalesced();
        self.with_metrics(|metrics| metrics.record_viewport_update(coalesced));
        self.log(
            LogLevel::Info,
            "viewport_applied",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
                json_kv("coalesced", json!(coalesced)),
            ],
        );
        self.recompute("viewport_changed");
    }

    fn recompute(&mut self, reason: &str) {
        let repaired = self.selection.repair(&self.roster);
        if !repaired.is_empty() {
            self.mark_expanded(false, "selection_repaired");
            self.with_metrics(|metrics| metrics.record_selection_repairs(repaired.count()));
            self.log(
                LogLevel::Debug,
                "selection_repaired",
                [
                    json_kv(
                        "presenter",
                        json!(repaired.presenter.as_ref().map(TileId::as_str)),
                    ),
                    json_kv("pinned", json!(repaired.pinned.as_ref().map(TileId::as_str))),
                ],
            );
        }

        self.frame = compose_frame(
            self.roster.tiles(),
            &self.selection,
            self.expanded,
            self.viewport.current(),
            &self.config.strip,
        );

        self.with_metrics(EngineMetrics::record_recompute);
        self.log(
            LogLevel::Debug,
            "frame_recomputed",
            [
                json_kv("reason", json!(reason)),
                json_kv("tiles", json!(self.frame.tiles.len())),
                json_kv("columns", json!(self.frame.geometry.columns)),
                json_kv("rows", json!(self.frame.geometry.rows)),
                json_kv("hidden", json!(self.frame.more.map_or(0, |more| more.hidden))),
                json_kv("expanded", json!(self.expanded)),
            ],
        );
    }

    /// Set the expanded flag, logging only actual transitions.
    fn mark_expanded(&mut self, expanded: bool, cause: &str) {
        if self.expanded == expanded {
            return;
        }
        self.expanded = expanded;
        self.log(
            LogLevel::Debug,
            "expanded_list_toggled",
            [
                json_kv("expanded", json!(expanded)),
                json_kv("cause", json!(cause)),
            ],
        );
    }

    fn log_ignored(&self, axis: Axis, id: &TileId, reason: &str) {
        self.log(
            LogLevel::Debug,
            "intent_ignored",
            [
                json_kv("axis", json!(axis.as_str())),
                json_kv("tile", json!(id.as_str())),
                json_kv("reason", json!(reason)),
            ],
        );
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn with_metrics(&self, record: impl FnOnce(&mut EngineMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TileRole;
    use crate::grid::LayoutMode;
    use crate::logging::{Logger, MemorySink};
    use crate::notify::{PinNotice, RecordingPinNotifier};
    use crate::selection::SelectionAxes;
    use std::time::Duration;

    fn tiles(count: usize) -> Vec<Tile> {
        (1..=count)
            .map(|i| Tile::new(format!("video-{i}"), format!("Participant {i}")))
            .collect()
    }

    fn id(raw: &str) -> TileId {
        TileId::from(raw)
    }

    fn engine_with(count: usize) -> (PinBoardEngine, Arc<RecordingPinNotifier>) {
        let recorder = Arc::new(RecordingPinNotifier::new());
        let mut engine = PinBoardEngine::new(EngineConfig::default()).with_notifier(recorder.clone());
        engine.replace_source(tiles(count));
        (engine, recorder)
    }

    #[test]
    fn pin_and_unpin_notify_once_each() {
        let (mut engine, recorder) = engine_with(6);
        engine.toggle_pinned(&id("video-2"));
        engine.toggle_pinned(&id("video-2"));
        assert_eq!(
            recorder.notices(),
            vec![
                PinNotice::Pinned(id("video-2")),
                PinNotice::Unpinned(id("video-2")),
            ]
        );
    }

    #[test]
    fn replacing_pin_does_not_emit_unpin() {
        let (mut engine, recorder) = engine_with(6);
        engine.toggle_pinned(&id("video-1"));
        engine.toggle_pinned(&id("video-3"));
        assert_eq!(
            recorder.notices(),
            vec![
                PinNotice::Pinned(id("video-1")),
                PinNotice::Pinned(id("video-3")),
            ]
        );
        assert_eq!(engine.selection().pinned(), Some(&id("video-3")));
    }

    #[test]
    fn presenter_changes_are_silent() {
        let (mut engine, recorder) = engine_with(4);
        engine.toggle_presenter(&id("video-1"));
        engine.toggle_presenter(&id("video-1"));
        assert!(recorder.notices().is_empty());
    }

    #[test]
    fn unknown_tiles_are_ignored() {
        let (mut engine, recorder) = engine_with(4);
        assert!(engine.toggle_pinned(&id("nobody")).is_none());
        assert!(engine.toggle_presenter(&id("nobody")).is_none());
        assert_eq!(engine.selection(), &SelectionState::new());
        assert!(recorder.notices().is_empty());
    }

    #[test]
    fn disabled_axis_ignores_intents() {
        let config = EngineConfig {
            axes: SelectionAxes::presenter_only(),
            ..EngineConfig::default()
        };
        let mut engine = PinBoardEngine::new(config);
        engine.replace_source(tiles(4));
        assert!(engine.toggle_pinned(&id("video-1")).is_none());
        assert!(engine.toggle_presenter(&id("video-1")).is_some());
        assert_eq!(engine.frame().mode(), LayoutMode::Single);
    }

    #[test]
    fn clearing_a_selection_closes_expanded_list() {
        let (mut engine, _) = engine_with(12);
        engine.toggle_presenter(&id("video-1"));
        engine.toggle_pinned(&id("video-2"));
        assert!(engine.toggle_expanded());

        engine.toggle_presenter(&id("video-1"));
        assert!(!engine.is_expanded());
        assert_eq!(engine.selection().pinned(), Some(&id("video-2")));
    }

    #[test]
    fn explicit_intents_are_idempotent() {
        let (mut engine, recorder) = engine_with(4);
        let pin = TileEvent::new("video-1", TileIntent::Pin);
        assert!(engine.apply(&pin).is_some());
        assert!(engine.apply(&pin).is_none());
        assert!(engine.apply(&TileEvent::new("video-2", TileIntent::Unpin)).is_none());
        assert!(engine.apply(&TileEvent::new("video-1", TileIntent::Unpin)).is_some());
        assert_eq!(recorder.notices().len(), 2);

        engine.apply(&TileEvent::new("video-3", TileIntent::Present));
        assert!(engine.apply(&TileEvent::new("video-3", TileIntent::Present)).is_none());
        engine.apply(&TileEvent::new("video-3", TileIntent::Unpresent));
        assert!(engine.selection().presenter().is_none());

        engine.apply(&TileEvent::new("video-3", TileIntent::ToggleExpanded));
        assert!(engine.is_expanded());
    }

    #[test]
    fn roster_replacement_repairs_selection() {
        let (mut engine, recorder) = engine_with(6);
        engine.toggle_pinned(&id("video-5"));
        engine.toggle_presenter(&id("video-1"));

        engine.replace_source(tiles(4));
        assert!(engine.selection().pinned().is_none());
        assert_eq!(engine.selection().presenter(), Some(&id("video-1")));
        assert_eq!(engine.frame().mode(), LayoutMode::Single);
        assert_eq!(recorder.notices(), vec![PinNotice::Pinned(id("video-5"))]);
    }

    #[test]
    fn lowering_visible_count_drops_selection_outside_roster() {
        let (mut engine, _) = engine_with(8);
        engine.toggle_presenter(&id("video-8"));
        engine.set_visible_count(4);
        assert!(engine.selection().presenter().is_none());
        assert_eq!(engine.frame().tiles.len(), 4);

        engine.set_visible_count(0);
        assert_eq!(engine.roster().len(), 1);
    }

    #[test]
    fn hinted_presenter_is_only_adopted_on_request() {
        let mut engine = PinBoardEngine::new(EngineConfig::default());
        engine.replace_source(vec![
            Tile::new("host", "Host"),
            Tile::new("presenter", "Presenter").with_presenter_hint(true),
        ]);
        assert!(engine.selection().presenter().is_none());

        let change = engine.present_hinted().unwrap();
        assert_eq!(change.tile(), &id("presenter"));
        assert!(engine.present_hinted().is_none());
    }

    #[test]
    fn settled_resize_recomputes_strip() {
        let (mut engine, _) = engine_with(20);
        engine.toggle_presenter(&id("video-1"));
        assert_eq!(engine.frame().strip_capacity, 4);

        let start = Instant::now();
        let feed = engine.viewport_feed();
        feed.notify_at(Size::new(100, 30), start);
        feed.notify_at(Size::new(169, 30), start + Duration::from_millis(5));

        assert!(!engine.poll_viewport(start + Duration::from_millis(10)));
        assert!(engine.poll_viewport(start + Duration::from_millis(100)));
        assert_eq!(engine.viewport_size(), Size::new(169, 30));
        assert_eq!(engine.frame().strip_capacity, 10);
        assert_eq!(engine.frame().with_role(TileRole::Strip).count(), 9);
    }

    #[test]
    fn frame_is_taken_only_when_changed() {
        let (mut engine, _) = engine_with(4);
        assert!(engine.take_frame_if_changed().is_some());
        assert!(engine.take_frame_if_changed().is_none());

        engine.set_expanded(false);
        assert!(engine.take_frame_if_changed().is_none());

        engine.toggle_pinned(&id("video-2"));
        assert!(engine.take_frame_if_changed().is_some());
    }

    #[test]
    fn new_stream_for_same_tile_surfaces_frame() {
        let mut engine = PinBoardEngine::new(EngineConfig::default());
        engine.replace_source(vec![Tile::new("a", "Alice").with_media_source("rtsp://one")]);
        assert!(engine.take_frame_if_changed().is_some());

        engine.replace_source(vec![Tile::new("a", "Alice").with_media_source("rtsp://two")]);
        let frame = engine.take_frame_if_changed().unwrap();
        assert_eq!(frame.tiles[0].tile.media_source.as_deref(), Some("rtsp://two"));

        engine.replace_source(vec![
            Tile::new("a", "Alice")
                .with_media_source("rtsp://two")
                .with_presenter_hint(true),
        ]);
        assert!(engine.take_frame_if_changed().is_some());
    }

    #[test]
    fn implicit_list_close_is_logged() {
        let sink = Arc::new(MemorySink::new());
        let config = EngineConfig::default().with_logger(Logger::from_arc(sink.clone()));
        let mut engine = PinBoardEngine::new(config);
        engine.replace_source(tiles(3));

        engine.toggle_pinned(&id("video-1"));
        engine.set_expanded(true);
        engine.toggle_pinned(&id("video-1"));
        assert!(!engine.is_expanded());

        engine.toggle_presenter(&id("video-2"));
        engine.set_expanded(true);
        engine.replace_source(tiles(1));
        assert!(!engine.is_expanded());

        let causes: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|event| event.message == "expanded_list_toggled")
            .filter_map(|event| event.field("cause").and_then(|v| v.as_str()).map(str::to_string))
            .collect();
        assert_eq!(
            causes,
            vec![
                "requested",
                "selection_cleared",
                "requested",
                "selection_repaired",
            ]
        );
    }

    #[test]
    fn logs_and_metrics_follow_events() {
        let sink = Arc::new(MemorySink::new());
        let mut config = EngineConfig::default().with_logger(Logger::from_arc(sink.clone()));
        config.enable_metrics();
        let mut engine = PinBoardEngine::new(config);

        engine.replace_source(tiles(3));
        engine.toggle_pinned(&id("video-1"));
        engine.replace_source(tiles(0));
        engine.emit_metrics();

        let messages = sink.messages();
        assert_eq!(messages[0], "engine_constructed");
        assert!(messages.contains(&"selection_repaired".to_string()));
        assert_eq!(messages.last().map(String::as_str), Some("engine_metrics"));

        let snapshot = engine.metrics_snapshot().unwrap();
        assert_eq!(snapshot.roster_replacements, 2);
        assert_eq!(snapshot.selection_changes, 1);
        assert_eq!(snapshot.selection_repairs, 1);
        assert_eq!(snapshot.recomputes, 3);
    }
}
