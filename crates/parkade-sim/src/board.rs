//! Simulated board wiring.
//!
//! The console feeds presence loops and key presses through mock handles.
//! Presses typed while no PIN prompt is running are dropped when the next
//! prompt starts, the way a real matrix keypad only reports keys held at
//! scan time.

use std::time::Duration;

use parkade_core::{Key, Level, Sensor};
use parkade_hardware::{
    Result,
    mock::{MockInputHandle, MockKeypad, MockKeypadHandle},
    traits::{DigitalOutput, Keypad},
};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::commands::{Command, HELP};
use crate::terminal::Snapshot;

/// Slack added to the poll interval before a scan gap counts as a new prompt.
const PROMPT_GAP_SLACK: Duration = Duration::from_millis(250);

/// Keypad fed from the console.
///
/// The verifier scans at least once per poll interval while a prompt is
/// open. A longer gap means the prompt is new, and anything queued before
/// it is discarded.
#[derive(Debug)]
pub struct ConsoleKeypad {
    inner: MockKeypad,
    last_scan: Option<Instant>,
    stale_after: Duration,
}

impl ConsoleKeypad {
    pub fn new(inner: MockKeypad, poll_interval: Duration) -> Self {
        Self {
            inner,
            last_scan: None,
            stale_after: poll_interval + PROMPT_GAP_SLACK,
        }
    }
}

impl Keypad for ConsoleKeypad {
    async fn scan(&mut self) -> Result<Option<Key>> {
        let now = Instant::now();
        let prompt_started = self
            .last_scan
            .is_none_or(|last| now.duration_since(last) > self.stale_after);
        self.last_scan = Some(now);

        if prompt_started {
            let dropped = self.inner.drain();
            if dropped > 0 {
                debug!(dropped, "Discarded keys pressed outside a PIN prompt");
            }
        }
        self.inner.scan().await
    }
}

/// Motor line that only logs what it is driven to.
#[derive(Debug)]
pub struct LoggedOutput {
    name: &'static str,
    level: Level,
}

impl LoggedOutput {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            level: Level::Low,
        }
    }
}

impl DigitalOutput for LoggedOutput {
    async fn set(&mut self, level: Level) -> Result<()> {
        if level != self.level {
            debug!(pin = self.name, ?level, "Motor line changed");
        }
        self.level = level;
        Ok(())
    }
}

/// Stdin side of the simulated board.
pub struct Board {
    pub entry: MockInputHandle,
    pub exit: MockInputHandle,
    pub keys: MockKeypadHandle,
    pub active: Level,
}

impl Board {
    pub fn apply(
        &self,
        command: Command,
        status: &watch::Receiver<Snapshot>,
    ) -> anyhow::Result<()> {
        match command {
            Command::Sensor { sensor, present } => {
                let level = if present {
                    self.active
                } else {
                    self.active.inverted()
                };
                let handle = match sensor {
                    Sensor::Entry => &self.entry,
                    Sensor::Exit => &self.exit,
                };
                handle.set(level);
                info!(%sensor, present, "Sensor changed");
            }
            Command::Keys(keys) => {
                for key in keys {
                    self.keys.press(key)?;
                }
            }
            Command::Status => println!("{}", *status.borrow()),
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
        Ok(())
    }
}
