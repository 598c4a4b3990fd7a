use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct EngineMetrics {
    recomputes: u64,
    roster_replacements: u64,
    selection_changes: u64,
    selection_repairs: u64,
    viewport_updates: u64,
    coalesced_resizes: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_recompute(&mut self) {
        self.recomputes = self.recomputes.saturating_add(1);
    }

    pub fn record_roster_replacement(&mut self) {
        self.roster_replacements = self.roster_replacements.saturating_add(1);
    }

    pub fn record_selection_change(&mut self) {
        self.selection_changes = self.selection_changes.saturating_add(1);
    }

    pub fn record_selection_repairs(&mut self, count: usize) {
        self.selection_repairs = self.selection_repairs.saturating_add(count as u64);
    }

    pub fn record_viewport_update(&mut self, coalesced: u64) {
        self.viewport_updates = self.viewport_updates.saturating_add(1);
        self.coalesced_resizes = self.coalesced_resizes.saturating_add(coalesced);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            recomputes: self.recomputes,
            roster_replacements: self.roster_replacements,
            selection_changes: self.selection_changes,
            selection_repairs: self.selection_repairs,
            viewport_updates: self.viewport_updates,
            coalesced_resizes: self.coalesced_resizes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub recomputes: u64,
    pub roster_replacements: u64,
    pub selection_changes: u64,
    pub selection_repairs: u64,
    pub viewport_updates: u64,
    pub coalesced_resizes: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "engine_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("recomputes".to_string(), json!(self.recomputes));
        map.insert(
            "roster_replacements".to_string(),
            json!(self.roster_replacements),
        );
        map.insert("selection_changes".to_string(), json!(self.selection_changes));
        map.insert("selection_repairs".to_string(), json!(self.selection_repairs));
        map.insert("viewport_updates".to_string(), json!(self.viewport_updates));
        map.insert("coalesced_resizes".to_string(), json!(self.coalesced_resizes));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = EngineMetrics::new();
        metrics.record_recompute();
        metrics.record_recompute();
        metrics.record_selection_change();
        metrics.record_selection_repairs(2);
        metrics.record_viewport_update(3);

        let snap = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snap.uptime_ms, 1500);
        assert_eq!(snap.recomputes, 2);
        assert_eq!(snap.selection_changes, 1);
        assert_eq!(snap.selection_repairs, 2);
        assert_eq!(snap.viewport_updates, 1);
        assert_eq!(snap.coalesced_resizes, 3);
    }

    #[test]
    fn snapshot_event_carries_fields() {
        let snap = EngineMetrics::new().snapshot(Duration::ZERO);
        let event = snap.to_log_event("pinboard::engine.metrics");
        assert_eq!(event.message, "engine_metrics");
        assert_eq!(event.target, "pinboard::engine.metrics");
        assert_eq!(event.fields.len(), 7);
    }
}
