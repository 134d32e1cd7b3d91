//! Parkade gate controller.
//!
//! This crate contains the control logic of the parking facility: PIN
//! verification, gate actuation with ledger bookkeeping, presence sensing and
//! the entry/exit state machine that ties them together. It only talks to
//! the outside world through the traits in `parkade_hardware`.
//!
//! # Example
//!
//! ```
//! use parkade_core::{ControllerConfig, Level};
//! use parkade_controller::{GatePins, Orchestrator, Peripherals};
//! use parkade_hardware::VirtualLcd;
//! use parkade_hardware::mock::{MockKeypad, PinJournal, ScriptedInput, VirtualClock};
//!
//! # async fn example() -> parkade_controller::Result<()> {
//! let pins = PinJournal::new();
//! let peripherals = Peripherals {
//!     keypad: MockKeypad::default(),
//!     display: VirtualLcd::default(),
//!     entry_sensor: ScriptedInput::constant(Level::High),
//!     exit_sensor: ScriptedInput::constant(Level::High),
//!     entry_gate: GatePins::new(pins.output("entry_fwd"), pins.output("entry_rev")),
//!     exit_gate: GatePins::new(pins.output("exit_fwd"), pins.output("exit_rev")),
//!     clock: VirtualClock::new(),
//! };
//!
//! let mut controller = Orchestrator::new(&ControllerConfig::default(), peripherals)?;
//! assert_eq!(controller.poll_once().await?, None);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gate;
pub mod orchestrator;
pub mod sensor;
pub mod state_machine;
pub mod verifier;

pub use error::{ControllerError, Result};
pub use gate::{GateController, GatePins};
pub use orchestrator::{Activity, ControllerStats, Orchestrator, Peripherals};
pub use sensor::PresenceSensor;
pub use state_machine::{ControllerState, StateMachine, StateTransition};
pub use verifier::CredentialVerifier;
