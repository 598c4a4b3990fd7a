//! Pin notification collaborator.
//!
//! Hosts learn about pin transitions through a [`PinNotifier`]. Presenter
//! changes are a layout concern only and never reach it.

use std::sync::Mutex;

use serde_json::json;

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::roster::{Tile, TileId};

/// Receives exactly one call per successful pin or unpin transition.
pub trait PinNotifier: Send + Sync {
    fn on_video_pin(&self, tile: &Tile);
    fn on_video_unpin(&self, tile: &Tile);
}

/// Default notifier used when the host does not care.
#[derive(Debug, Default)]
pub struct NullPinNotifier;

impl PinNotifier for NullPinNotifier {
    fn on_video_pin(&self, _tile: &Tile) {}
    fn on_video_unpin(&self, _tile: &Tile) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinNotice {
    Pinned(TileId),
    Unpinned(TileId),
}

/// Keeps every notice in order; handy for hosts that poll and for tests.
#[derive(Debug, Default)]
pub struct RecordingPinNotifier {
    notices: Mutex<Vec<PinNotice>>,
}

impl RecordingPinNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<PinNotice> {
        self.notices
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn push(&self, notice: PinNotice) {
        if let Ok(mut guard) = self.notices.lock() {
            guard.push(notice);
        }
    }
}

impl PinNotifier for RecordingPinNotifier {
    fn on_video_pin(&self, tile: &Tile) {
        self.push(PinNotice::Pinned(tile.id.clone()));
    }

    fn on_video_unpin(&self, tile: &Tile) {
        self.push(PinNotice::Unpinned(tile.id.clone()));
    }
}

/// Forwards pin transitions to the structured logger.
pub struct LoggingPinNotifier {
    logger: Logger,
}

impl LoggingPinNotifier {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    fn emit(&self, message: &str, tile: &Tile) {
        let event = event_with_fields(
            LogLevel::Info,
            "pinboard::notify",
            message,
            [
                json_kv("tile", json!(tile.id.as_str())),
                json_kv("name", json!(tile.display_name)),
            ],
        );
        let _ = self.logger.log_event(event);
    }
}

impl PinNotifier for LoggingPinNotifier {
    fn on_video_pin(&self, tile: &Tile) {
        self.emit("video_pinned", tile);
    }

    fn on_video_unpin(&self, tile: &Tile) {
        self.emit("video_unpinned", tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use std::sync::Arc;

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingPinNotifier::new();
        let tile = Tile::new("a", "Alice");
        notifier.on_video_pin(&tile);
        notifier.on_video_unpin(&tile);
        assert_eq!(
            notifier.notices(),
            vec![
                PinNotice::Pinned(TileId::from("a")),
                PinNotice::Unpinned(TileId::from("a")),
            ]
        );
    }

    #[test]
    fn logging_notifier_emits_events() {
        let sink = Arc::new(MemorySink::new());
        let notifier = LoggingPinNotifier::new(Logger::from_arc(sink.clone()));
        notifier.on_video_pin(&Tile::new("b", "Bob"));
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "video_pinned");
        assert_eq!(events[0].field("tile"), Some(&json!("b")));
    }
}
