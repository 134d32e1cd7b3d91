//! Entry/exit orchestrator.
//!
//! The orchestrator is the controller's main loop. It owns every peripheral
//! and the capacity ledger, polls the two presence sensors and runs one
//! complete cycle at a time:
//!
//! - **Entry**: debounce, refuse with "PARKING FULL" if no slot is free,
//!   otherwise authenticate and open the entry gate.
//! - **Exit**: debounce and open the exit gate. Exits are never refused and
//!   never ask for a PIN.
//!
//! After a cycle the capacity display is refreshed and the orchestrator waits
//! for the triggering sensor to clear, so a vehicle standing on the loop is
//! served once. Entry is checked before exit on every pass.
//!
//! Everything runs in program order on one task; while one gate is cycling
//! the other sensor is not looked at.

use std::convert::Infallible;

use parkade_core::{
    CapacityLedger, ControllerConfig, Gate, Level, Sensor, TimingConfig,
    constants::{MSG_AVAILABLE_SLOTS, MSG_PARKING_FULL},
};
use parkade_hardware::{
    Countdown,
    traits::{Clock, DigitalInput, DigitalOutput, Display, Keypad},
};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    Result,
    gate::{GateController, GatePins},
    sensor::PresenceSensor,
    state_machine::{ControllerState, StateMachine},
    verifier::CredentialVerifier,
};

/// Everything the orchestrator drives.
#[derive(Debug)]
pub struct Peripherals<K, D, I, O, C> {
    pub keypad: K,
    pub display: D,
    pub entry_sensor: I,
    pub exit_sensor: I,
    pub entry_gate: GatePins<O>,
    pub exit_gate: GatePins<O>,
    pub clock: C,
}

/// Outcome of one [`Orchestrator::poll_once`] pass that saw a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// A vehicle authenticated and the entry gate cycled.
    Entered { attempts: u32 },

    /// The lot was full; no PIN was asked and no gate moved.
    EntryRefused,

    /// The exit gate cycled.
    Exited,

    /// The sensor was no longer active after the debounce wait.
    Bounced(Sensor),
}

/// Running totals since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    pub entries: u64,
    pub exits: u64,
    pub refused_entries: u64,
    pub failed_pin_attempts: u64,
    pub bounces: u64,
}

/// The parking controller state machine.
#[derive(Debug)]
pub struct Orchestrator<K, D, I, O, C> {
    keypad: K,
    display: D,
    entry_sensor: PresenceSensor<I>,
    exit_sensor: PresenceSensor<I>,
    gates: GateController<O>,
    clock: C,
    verifier: CredentialVerifier,
    ledger: CapacityLedger,
    machine: StateMachine,
    timing: TimingConfig,
    stats: ControllerStats,
}

impl<K, D, I, O, C> Orchestrator<K, D, I, O, C>
where
    K: Keypad,
    D: Display,
    I: DigitalInput,
    O: DigitalOutput,
    C: Clock,
{
    /// Build an orchestrator with every slot free.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config is invalid or the gate
    /// window is not a whole number of timer ticks.
    pub fn new(config: &ControllerConfig, peripherals: Peripherals<K, D, I, O, C>) -> Result<Self> {
        config.validate()?;

        let countdown = Countdown::new(config.timing.gate_open(), config.timing.timer_tick_hz)
            .map_err(|e| parkade_core::Error::Config(e.to_string()))?;
        let active_level = if config.sensors_active_low {
            Level::Low
        } else {
            Level::High
        };

        debug!(
            first_reload = countdown.first_reload(),
            overflows = countdown.overflows(),
            "Gate countdown calibrated"
        );

        let Peripherals {
            keypad,
            display,
            entry_sensor,
            exit_sensor,
            entry_gate,
            exit_gate,
            clock,
        } = peripherals;

        Ok(Self {
            keypad,
            display,
            entry_sensor: PresenceSensor::new(Sensor::Entry, entry_sensor, active_level),
            exit_sensor: PresenceSensor::new(Sensor::Exit, exit_sensor, active_level),
            gates: GateController::new(entry_gate, exit_gate, countdown),
            clock,
            verifier: CredentialVerifier::from_config(config)?,
            ledger: config.ledger()?,
            machine: StateMachine::new(),
            timing: config.timing,
            stats: ControllerStats::default(),
        })
    }

    /// Start from an existing fill level instead of an empty lot.
    pub fn with_ledger(mut self, ledger: CapacityLedger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Show the capacity screen, then serve vehicles forever.
    ///
    /// # Errors
    ///
    /// Only returns when a peripheral reports a fault.
    pub async fn run(&mut self) -> Result<Infallible> {
        self.run_with(|_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_cycle` after every pass that
    /// served a vehicle or ignored a bounce.
    ///
    /// # Errors
    ///
    /// Only returns when a peripheral reports a fault.
    pub async fn run_with<F>(&mut self, on_cycle: F) -> Result<Infallible>
    where
        F: FnMut(&Self, Activity),
    {
        info!(
            total_slots = self.ledger.total(),
            available = self.ledger.available(),
            "Controller started"
        );

        let fault = self.serve_forever(on_cycle).await;
        if let Err(ref e) = fault {
            error!(error = %e, "Controller stopped");
        }
        fault
    }

    async fn serve_forever<F>(&mut self, mut on_cycle: F) -> Result<Infallible>
    where
        F: FnMut(&Self, Activity),
    {
        self.refresh_display().await?;
        loop {
            if let Some(activity) = self.poll_once().await? {
                debug!(?activity, "Cycle complete");
                on_cycle(&*self, activity);
            }
        }
    }

    /// Run a single pass of the loop.
    ///
    /// Returns `None` when neither sensor was active; in that case one poll
    /// interval was waited.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Hardware` if a peripheral fails. The state
    /// machine is back in `Idle` afterwards.
    pub async fn poll_once(&mut self) -> Result<Option<Activity>> {
        if self.entry_sensor.is_active().await? {
            return self.serve(Sensor::Entry).await.map(Some);
        }
        if self.exit_sensor.is_active().await? {
            return self.serve(Sensor::Exit).await.map(Some);
        }

        self.clock.wait_for(self.timing.poll_interval()).await;
        Ok(None)
    }

    /// Draw the capacity screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the display fails.
    pub async fn refresh_display(&mut self) -> Result<()> {
        let line2 = if self.ledger.is_full() {
            MSG_PARKING_FULL.to_string()
        } else {
            format!("{:02}", self.ledger.available())
        };
        self.display.show(MSG_AVAILABLE_SLOTS, &line2).await?;
        Ok(())
    }

    async fn serve(&mut self, sensor: Sensor) -> Result<Activity> {
        self.clock.wait_for(self.timing.debounce()).await;
        if !self.sensor_mut(sensor).is_active().await? {
            self.stats.bounces += 1;
            debug!(%sensor, "Sensor bounce ignored");
            return Ok(Activity::Bounced(sensor));
        }

        let activity = match sensor.gate() {
            Gate::Entry => self.serve_entry().await?,
            Gate::Exit => self.serve_exit().await?,
        };
        self.refresh_display().await?;

        self.machine
            .transition_to(ControllerState::awaiting_release(sensor))?;
        if let Err(e) = self.wait_for_release(sensor).await {
            self.machine.reset();
            return Err(e);
        }
        self.machine.transition_to(ControllerState::Idle)?;

        Ok(activity)
    }

    async fn serve_entry(&mut self) -> Result<Activity> {
        if self.ledger.is_full() {
            self.stats.refused_entries += 1;
            info!("Entry refused, parking full");

            self.display.show(MSG_PARKING_FULL, "").await?;
            self.clock.wait_for(self.timing.full_dwell()).await;
            return Ok(Activity::EntryRefused);
        }

        let authenticated = self
            .verifier
            .authenticate(&mut self.keypad, &mut self.display, &mut self.clock)
            .await;
        // Wrong codes count even when the prompt is cut short by a fault.
        self.stats.failed_pin_attempts = self.verifier.failed_attempts();
        let attempts = authenticated?;

        self.gates
            .open(Gate::Entry, &mut self.ledger, &mut self.clock)
            .await?;
        self.stats.entries += 1;
        info!(available = self.ledger.available(), "Vehicle entered");

        Ok(Activity::Entered { attempts })
    }

    async fn serve_exit(&mut self) -> Result<Activity> {
        self.gates
            .open(Gate::Exit, &mut self.ledger, &mut self.clock)
            .await?;
        self.stats.exits += 1;
        info!(available = self.ledger.available(), "Vehicle exited");

        Ok(Activity::Exited)
    }

    /// Block until `sensor` reads inactive, then debounce.
    async fn wait_for_release(&mut self, sensor: Sensor) -> Result<()> {
        while self.sensor_mut(sensor).is_active().await? {
            self.clock.wait_for(self.timing.poll_interval()).await;
        }
        self.clock.wait_for(self.timing.debounce()).await;
        Ok(())
    }

    fn sensor_mut(&mut self, sensor: Sensor) -> &mut PresenceSensor<I> {
        match sensor {
            Sensor::Entry => &mut self.entry_sensor,
            Sensor::Exit => &mut self.exit_sensor,
        }
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    pub fn state(&self) -> ControllerState {
        self.machine.current_state()
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn gates(&self) -> &GateController<O> {
        &self.gates
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }
}
