//! Gate actuation.
//!
//! Each gate motor is driven through a pair of directional lines. Opening
//! drives `forward` high with `reverse` low; stopping drives both low. The
//! reverse line is always lowered before the forward line is raised, so the
//! pair is never high at the same time.
//!
//! A gate cycle also settles the ledger: an entry takes a slot, an exit gives
//! one back. The ledger is only touched once the motor has actually been
//! driven.

use parkade_core::{CapacityLedger, Gate, Level};
use parkade_hardware::{
    Countdown, Result,
    traits::{Clock, DigitalOutput},
};
use tracing::{info, warn};

/// The two motor lines of one gate.
#[derive(Debug)]
pub struct GatePins<O> {
    forward: O,
    reverse: O,
}

impl<O: DigitalOutput> GatePins<O> {
    pub fn new(forward: O, reverse: O) -> Self {
        Self { forward, reverse }
    }

    /// Run the motor in the opening direction.
    ///
    /// # Errors
    ///
    /// Returns the first line that could not be driven.
    pub async fn drive_forward(&mut self) -> Result<()> {
        self.reverse.set(Level::Low).await?;
        self.forward.set(Level::High).await
    }

    /// Drive both lines low.
    ///
    /// Both lines are attempted even if the first one fails.
    ///
    /// # Errors
    ///
    /// Returns the first failure.
    pub async fn stop(&mut self) -> Result<()> {
        let forward = self.forward.set(Level::Low).await;
        let reverse = self.reverse.set(Level::Low).await;
        forward.and(reverse)
    }

    pub fn forward(&self) -> &O {
        &self.forward
    }

    pub fn reverse(&self) -> &O {
        &self.reverse
    }
}

/// Drives both gates for a calibrated window.
#[derive(Debug)]
pub struct GateController<O> {
    entry: GatePins<O>,
    exit: GatePins<O>,
    countdown: Countdown,
}

impl<O: DigitalOutput> GateController<O> {
    pub fn new(entry: GatePins<O>, exit: GatePins<O>, countdown: Countdown) -> Self {
        Self {
            entry,
            exit,
            countdown,
        }
    }

    /// Open `gate` for the countdown window and settle the ledger.
    ///
    /// An entry with no free slot still opens the gate; the ledger simply
    /// stays at zero. Both lines are lowered on every path out of this call.
    ///
    /// # Errors
    ///
    /// Returns an error if a motor line cannot be driven. When the forward
    /// drive fails the ledger is left untouched and the window is skipped;
    /// the error is reported after the stop was attempted.
    pub async fn open<C: Clock>(
        &mut self,
        gate: Gate,
        ledger: &mut CapacityLedger,
        clock: &mut C,
    ) -> Result<()> {
        let pins = match gate {
            Gate::Entry => &mut self.entry,
            Gate::Exit => &mut self.exit,
        };

        let cycle = match pins.drive_forward().await {
            Ok(()) => {
                match gate {
                    Gate::Entry => {
                        if !ledger.try_consume_slot() {
                            warn!(%gate, "Gate opened with no free slot");
                        }
                    }
                    Gate::Exit => ledger.release_slot(),
                }
                info!(
                    %gate,
                    available = ledger.available(),
                    window_ms = self.countdown.window().as_millis() as u64,
                    "Gate open"
                );

                self.countdown.run(clock).await;
                Ok(())
            }
            Err(e) => Err(e),
        };

        let stopped = pins.stop().await;
        info!(%gate, "Gate closed");

        cycle.and(stopped)
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// The motor lines of `gate`.
    pub fn pins(&self, gate: Gate) -> &GatePins<O> {
        match gate {
            Gate::Entry => &self.entry,
            Gate::Exit => &self.exit,
        }
    }
}
