use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::error::Result;
use crate::geometry::Size;
use crate::logging::Logger;
use crate::metrics::EngineMetrics;
use crate::overflow::StripMetrics;
use crate::roster::DEFAULT_VISIBLE_COUNT;
use crate::selection::SelectionAxes;
use crate::viewport::ViewportSettings;

pub const DEFAULT_METRICS_TARGET: &str = "pinboard::engine.metrics";

/// Fallback surface size used until the host measures the real one.
const FALLBACK_VIEWPORT: Size = Size::new(80, 24);

/// Construction-time settings for [`PinBoardEngine`](super::PinBoardEngine).
///
/// Plain fields can be loaded from JSON; the logger and metrics handles are
/// attached in code.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on tiles taken from the upstream source. Zero is clamped to one.
    pub visible_count: usize,
    /// Surface size assumed before the first measurement lands.
    pub initial_viewport: Size,
    /// Selection axes this host exposes.
    pub axes: SelectionAxes,
    pub strip: StripMetrics,
    pub viewport: ViewportSettings,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Optional structured logger used by the engine.
    #[serde(skip)]
    pub logger: Option<Logger>,
    #[serde(skip)]
    pub metrics: Option<Arc<Mutex<EngineMetrics>>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            visible_count: DEFAULT_VISIBLE_COUNT,
            initial_viewport: FALLBACK_VIEWPORT,
            axes: SelectionAxes::default(),
            strip: StripMetrics::default(),
            viewport: ViewportSettings::default(),
            metrics_target: DEFAULT_METRICS_TARGET.to_string(),
            logger: None,
            metrics: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(EngineMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<EngineMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}
