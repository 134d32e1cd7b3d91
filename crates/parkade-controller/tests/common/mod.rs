//! Common test utilities for controller integration tests.
//!
//! A [`Rig`] is an orchestrator wired to mock peripherals, plus the
//! observers a test needs to look at what happened: the pin journal, the
//! virtual clock and read logs of both sensors.
//!
//! Sensors are scripted. A vehicle pass on the default active-low sensors is
//! three reads: active on the poll, still active after the debounce, and
//! released on the first release check. The keypad holds exactly the keys
//! the test queued; any further scan fails, so a test never hangs on an
//! unexpected PIN prompt.

#![allow(dead_code)]

use parkade_controller::{GatePins, Orchestrator, Peripherals};
use parkade_core::{CapacityLedger, ControllerConfig, Level};
use parkade_hardware::{
    VirtualLcd,
    mock::{MockKeypad, MockOutput, PinJournal, ScriptedInput, VirtualClock},
};

pub type TestController =
    Orchestrator<MockKeypad, VirtualLcd, ScriptedInput, MockOutput, VirtualClock>;

pub const ENTRY_FWD: &str = "entry_fwd";
pub const ENTRY_REV: &str = "entry_rev";
pub const EXIT_FWD: &str = "exit_fwd";
pub const EXIT_REV: &str = "exit_rev";

pub struct Rig {
    pub controller: TestController,
    pub pins: PinJournal,
    pub clock: VirtualClock,
    pub entry: ScriptedInput,
    pub exit: ScriptedInput,
}

impl Rig {
    /// Build a rig with the default configuration and an empty lot.
    pub fn new(keys: &str, entry: ScriptedInput, exit: ScriptedInput) -> Self {
        Self::with_config(&ControllerConfig::default(), keys, entry, exit)
    }

    pub fn with_config(
        config: &ControllerConfig,
        keys: &str,
        entry: ScriptedInput,
        exit: ScriptedInput,
    ) -> Self {
        let clock = VirtualClock::new();
        let pins = PinJournal::with_clock(clock.clone());

        let peripherals = Peripherals {
            keypad: MockKeypad::with_presses(keys).expect("valid key symbols"),
            display: VirtualLcd::default(),
            entry_sensor: entry.clone(),
            exit_sensor: exit.clone(),
            entry_gate: GatePins::new(pins.output(ENTRY_FWD), pins.output(ENTRY_REV)),
            exit_gate: GatePins::new(pins.output(EXIT_FWD), pins.output(EXIT_REV)),
            clock: clock.clone(),
        };
        let controller = Orchestrator::new(config, peripherals).expect("valid configuration");

        Self {
            controller,
            pins,
            clock,
            entry,
            exit,
        }
    }

    /// Start from `available` free slots out of `total`.
    pub fn at_fill(mut self, total: u8, available: u8) -> Self {
        let ledger = CapacityLedger::with_available(total, available).expect("valid fill level");
        self.controller = self.controller.with_ledger(ledger);
        self
    }

    /// Returns `true` if a forward and a reverse line of one gate were
    /// ever high at the same time.
    pub fn any_gate_shorted(&self) -> bool {
        let mut levels = [Level::Low; 4];
        for event in self.pins.events() {
            let index = match event.pin.as_str() {
                ENTRY_FWD => 0,
                ENTRY_REV => 1,
                EXIT_FWD => 2,
                EXIT_REV => 3,
                _ => continue,
            };
            levels[index] = event.level;
            if (levels[0].is_high() && levels[1].is_high())
                || (levels[2].is_high() && levels[3].is_high())
            {
                return true;
            }
        }
        false
    }
}

/// Sensor that is never active.
pub fn idle() -> ScriptedInput {
    ScriptedInput::constant(Level::High)
}

/// Sensor script for `count` clean vehicle passes.
pub fn passes(count: usize) -> ScriptedInput {
    let mut script = Vec::with_capacity(count * 3);
    for _ in 0..count {
        script.extend([Level::Low, Level::Low, Level::High]);
    }
    ScriptedInput::new(script)
}

/// `count` correct default PINs.
pub fn pins(count: usize) -> String {
    "123".repeat(count)
}
