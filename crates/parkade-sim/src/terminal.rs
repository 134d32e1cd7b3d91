//! Terminal-backed display and status snapshot.

use std::fmt;

use parkade_controller::{ControllerState, ControllerStats, Orchestrator};
use parkade_hardware::{
    Result, VirtualLcd,
    traits::{Clock, DigitalInput, DigitalOutput, Display, Keypad},
};

/// Prints every frame shown on a [`VirtualLcd`].
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    lcd: VirtualLcd,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for TerminalDisplay {
    async fn show(&mut self, line1: &str, line2: &str) -> Result<()> {
        self.lcd.show(line1, line2).await?;
        println!("{}", self.lcd.render().join("\n"));
        Ok(())
    }
}

/// Controller state published after every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub available: u8,
    pub total: u8,
    pub state: ControllerState,
    pub stats: ControllerStats,
}

impl Snapshot {
    pub fn of<K, D, I, O, C>(controller: &Orchestrator<K, D, I, O, C>) -> Self
    where
        K: Keypad,
        D: Display,
        I: DigitalInput,
        O: DigitalOutput,
        C: Clock,
    {
        Self {
            available: controller.ledger().available(),
            total: controller.ledger().total(),
            state: controller.state(),
            stats: *controller.stats(),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slots {}/{} free, state {}, entries {}, exits {}, refused {}, wrong PINs {}, bounces {}",
            self.available,
            self.total,
            self.state,
            self.stats.entries,
            self.stats.exits,
            self.stats.refused_entries,
            self.stats.failed_pin_attempts,
            self.stats.bounces,
        )
    }
}
