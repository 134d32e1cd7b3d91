//! Mock digital pins.
//!
//! - [`MockInput`] follows a level set from a [`MockInputHandle`], for
//!   interactive use.
//! - [`ScriptedInput`] plays back a fixed sequence of levels, one per read,
//!   for deterministic tests.
//! - [`MockOutput`] records every level it is driven to in a [`PinJournal`],
//!   stamped with virtual time when the journal has a clock.

use std::collections::VecDeque;
use std::time::Duration;

use parkade_core::Level;
use tokio::sync::watch;
use tracing::trace;

use super::{Journal, VirtualClock};
use crate::{
    Result,
    traits::{DigitalInput, DigitalOutput},
};

/// Input pin whose level is controlled through a handle.
#[derive(Debug)]
pub struct MockInput {
    level_rx: watch::Receiver<Level>,
}

impl MockInput {
    /// Create an input resting at `initial`.
    pub fn new(initial: Level) -> (Self, MockInputHandle) {
        let (level_tx, level_rx) = watch::channel(initial);
        (Self { level_rx }, MockInputHandle { level_tx })
    }
}

impl DigitalInput for MockInput {
    async fn read(&mut self) -> Result<Level> {
        Ok(*self.level_rx.borrow())
    }
}

/// Handle for driving a [`MockInput`].
#[derive(Debug, Clone)]
pub struct MockInputHandle {
    level_tx: watch::Sender<Level>,
}

impl MockInputHandle {
    /// Change the level seen by the input.
    ///
    /// Setting a level after the input was dropped is not an error; the
    /// level is simply not observed.
    pub fn set(&self, level: Level) {
        self.level_tx.send_replace(level);
    }

    /// Level currently presented to the input.
    pub fn level(&self) -> Level {
        *self.level_tx.borrow()
    }
}

/// Input pin that plays back a script of levels.
///
/// Each read consumes one level; once the script is exhausted the last level
/// is repeated forever.
///
/// # Examples
///
/// ```
/// use parkade_core::Level;
/// use parkade_hardware::mock::ScriptedInput;
/// use parkade_hardware::traits::DigitalInput;
///
/// # async fn example() -> parkade_hardware::Result<()> {
/// let mut input = ScriptedInput::new([Level::Low, Level::High]);
/// assert_eq!(input.read().await?, Level::Low);
/// assert_eq!(input.read().await?, Level::High);
/// assert_eq!(input.read().await?, Level::High);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    script: VecDeque<Level>,
    last: Level,
    reads: Journal<Level>,
}

impl ScriptedInput {
    /// Create an input from a script. An empty script reads `High`.
    pub fn new(script: impl IntoIterator<Item = Level>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: Level::High,
            reads: Journal::new(),
        }
    }

    /// Input that always reads `level`.
    pub fn constant(level: Level) -> Self {
        Self::new([level])
    }

    /// Append `count` reads of `level` to the script.
    pub fn then(mut self, level: Level, count: usize) -> Self {
        self.script.extend(std::iter::repeat_n(level, count));
        self
    }

    /// Every level returned so far. Clones share this record.
    pub fn reads(&self) -> Vec<Level> {
        self.reads.snapshot()
    }

    /// Number of scripted levels not yet read.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DigitalInput for ScriptedInput {
    async fn read(&mut self) -> Result<Level> {
        if let Some(level) = self.script.pop_front() {
            self.last = level;
        }
        self.reads.push(self.last);
        Ok(self.last)
    }
}

/// One level change recorded by a [`MockOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinEvent {
    /// Name of the output pin.
    pub pin: String,

    /// Level the pin was driven to.
    pub level: Level,

    /// Virtual time of the change (zero without a clock).
    pub at: Duration,
}

/// Ordered record of output pin changes, shared by several outputs.
#[derive(Debug, Clone, Default)]
pub struct PinJournal {
    events: Journal<PinEvent>,
    clock: Option<VirtualClock>,
}

impl PinJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Journal that stamps events with the virtual time of `clock`.
    pub fn with_clock(clock: VirtualClock) -> Self {
        Self {
            events: Journal::new(),
            clock: Some(clock),
        }
    }

    /// Create an output pin recording into this journal.
    pub fn output(&self, pin: impl Into<String>) -> MockOutput {
        MockOutput {
            name: pin.into(),
            journal: self.clone(),
        }
    }

    /// Every recorded change, oldest first.
    pub fn events(&self) -> Vec<PinEvent> {
        self.events.snapshot()
    }

    /// Changes recorded for one pin.
    pub fn events_for(&self, pin: &str) -> Vec<PinEvent> {
        self.events
            .with(|events| events.iter().filter(|e| e.pin == pin).cloned().collect())
    }

    /// Last level `pin` was driven to, if it was ever driven.
    pub fn level(&self, pin: &str) -> Option<Level> {
        self.events
            .with(|events| events.iter().rev().find(|e| e.pin == pin).map(|e| e.level))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn record(&self, pin: &str, level: Level) {
        let at = self
            .clock
            .as_ref()
            .map_or(Duration::ZERO, VirtualClock::elapsed);
        self.events.push(PinEvent {
            pin: pin.to_string(),
            level,
            at,
        });
    }
}

/// Output pin that records every level it is driven to.
#[derive(Debug, Clone)]
pub struct MockOutput {
    name: String,
    journal: PinJournal,
}

impl MockOutput {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl DigitalOutput for MockOutput {
    async fn set(&mut self, level: Level) -> Result<()> {
        trace!(pin = %self.name, ?level, "Output driven");
        self.journal.record(&self.name, level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Clock;

    #[tokio::test]
    async fn test_mock_input_follows_handle() {
        let (mut input, handle) = MockInput::new(Level::High);
        assert_eq!(input.read().await.unwrap(), Level::High);

        handle.set(Level::Low);
        assert_eq!(input.read().await.unwrap(), Level::Low);
        assert_eq!(handle.level(), Level::Low);
    }

    #[tokio::test]
    async fn test_scripted_input_repeats_last_level() {
        let mut input = ScriptedInput::new([Level::Low])
            .then(Level::High, 2)
            .then(Level::Low, 1);
        let observer = input.clone();

        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(input.read().await.unwrap());
        }

        assert_eq!(
            seen,
            vec![
                Level::Low,
                Level::High,
                Level::High,
                Level::Low,
                Level::Low,
                Level::Low
            ]
        );
        assert_eq!(observer.reads().len(), 6);
        assert_eq!(input.remaining(), 0);
    }

    #[tokio::test]
    async fn test_empty_script_reads_high() {
        let mut input = ScriptedInput::new([]);
        assert_eq!(input.read().await.unwrap(), Level::High);
    }

    #[tokio::test]
    async fn test_output_journal_records_order_and_time() {
        let clock = VirtualClock::new();
        let journal = PinJournal::with_clock(clock.clone());
        let mut a = journal.output("A");
        let mut b = journal.output("B");
        let mut timer = clock.clone();

        a.set(Level::High).await.unwrap();
        timer.wait_for(Duration::from_millis(5)).await;
        b.set(Level::Low).await.unwrap();

        let events = journal.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].pin, "A");
        assert_eq!(events[0].at, Duration::ZERO);
        assert_eq!(events[1].pin, "B");
        assert_eq!(events[1].at, Duration::from_millis(5));
        assert_eq!(journal.level("A"), Some(Level::High));
        assert_eq!(journal.level("C"), None);
        assert_eq!(journal.events_for("B").len(), 1);
    }
}
