//! Pin Board Demo
//!
//! Fills the board with a sample meeting roster and hands it to the terminal
//! driver. Use Tab/arrows to move focus, `p` to pin, `s` to present, `a` to
//! promote the flagged presenter, `e` to open the full participant list, and
//! `+`/`-` to change how many tiles are admitted. `q` exits.
//!
//! Set `PINBOARD_LOG=/tmp/pinboard.jsonl` to capture structured logs.
//!
//! ```bash
//! cargo run --example pinboard_demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use pinboard::{
    AnsiRenderer, BoardRuntime, CliDriver, CliDriverError, EngineConfig, FileSink, Logger,
    LoggingPinNotifier, PinBoardEngine, PinboardError, Result, Tile,
};

const LOG_CAP_BYTES: u64 = 1 << 20;

const PARTICIPANTS: &[&str] = &[
    "Alice Johnson",
    "Bob Smith",
    "Carol Davis",
    "David Wilson",
    "Emma Brown",
    "Frank Miller",
    "Grace Lee",
    "Henry Taylor",
    "Ivy Chen",
    "Jack Anderson",
    "Kate Thompson",
    "Liam Garcia",
    "Maya Patel",
    "Noah Kim",
    "Olivia Zhang",
    "Paul Rodriguez",
];

fn main() -> Result<()> {
    let mut config = EngineConfig::default();
    config.enable_metrics();
    if let Ok(path) = std::env::var("PINBOARD_LOG") {
        config = config.with_logger(Logger::new(FileSink::new(path, LOG_CAP_BYTES)?));
    }

    let notifier = config.logger.clone().map(LoggingPinNotifier::new);
    let mut engine = PinBoardEngine::new(config);
    if let Some(notifier) = notifier {
        engine = engine.with_notifier(Arc::new(notifier));
    }
    engine.replace_source(sample_roster());

    let mut runtime = BoardRuntime::new(engine, AnsiRenderer::with_default());
    runtime.config_mut().metrics_interval = Duration::from_secs(10);

    CliDriver::new(runtime).run().map_err(|err| match err {
        CliDriverError::Runtime(inner) => inner,
        other => PinboardError::Terminal(other.to_string()),
    })
}

fn sample_roster() -> Vec<Tile> {
    let mut tiles = vec![
        Tile::new("host", "Sarah Wilson (Host)").with_media_source("camera://host"),
        Tile::new("presenter", "John Smith")
            .with_media_source("camera://presenter")
            .with_presenter_hint(true),
        Tile::new("screenshare", "Emily Chen (Screen)").with_media_source("screen://emily"),
    ];
    tiles.extend(PARTICIPANTS.iter().enumerate().map(|(index, name)| {
        Tile::new(format!("participant-{}", index + 1), *name)
            .with_media_source(format!("camera://participant-{}", index + 1))
    }));
    tiles
}
