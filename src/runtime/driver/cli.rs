use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::error::PinboardError;
use crate::geometry::Size;
use crate::runtime::BoardRuntime;

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("runtime error: {0}")]
    Runtime(#[from] PinboardError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver that owns a [`BoardRuntime`] and manages raw mode and the
/// alternate screen around it.
pub struct CliDriver {
    runtime: BoardRuntime,
}

impl CliDriver {
    pub fn new(runtime: BoardRuntime) -> Self {
        Self { runtime }
    }

    pub fn run(mut self) -> DriverResult<()> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner(&mut stdout);
        self.exit(&mut stdout);
        result
    }

    /// Hand the runtime back once the terminal has been restored.
    pub fn into_runtime(self) -> BoardRuntime {
        self.runtime
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        let (width, height) =
            terminal::size().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        self.runtime.engine_mut().resize_now(Size::new(width, height));
        self.runtime.run(stdout)?;
        Ok(())
    }

    fn enter(&self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        execute!(stdout, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}
