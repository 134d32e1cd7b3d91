//! Hardware abstraction layer for the Parkade gate controller.
//!
//! This crate provides trait-based abstractions for the peripherals the
//! controller talks to: digital pins (presence sensors and gate motor
//! drivers), the keypad, the character display, and a time source. These
//! traits let the controller run unchanged against real drivers, the
//! terminal simulator, or the mocks used in tests.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All fallible operations return `Result<T>` with a
//!   [`HardwareError`]. Waiting on a [`Clock`](traits::Clock) cannot fail.
//!
//! # Building blocks
//!
//! - [`timer::Countdown`]: 16-bit timer calibration for the gate window.
//! - [`matrix::MatrixKeypad`]: row-by-row scanner for a 4x3 key matrix.
//! - [`lcd::VirtualLcd`]: in-memory character display with a frame journal.
//! - [`clock::TokioClock`]: wall-clock waits on the Tokio timer.
//! - [`mock`]: scripted pins, a queued keypad and a virtual clock.
//!
//! # Example
//!
//! ```no_run
//! use parkade_core::Level;
//! use parkade_hardware::traits::{Clock, DigitalOutput};
//! use parkade_hardware::Result;
//! use std::time::Duration;
//!
//! async fn pulse<O: DigitalOutput, C: Clock>(pin: &mut O, clock: &mut C) -> Result<()> {
//!     pin.set(Level::High).await?;
//!     clock.wait_for(Duration::from_millis(100)).await;
//!     pin.set(Level::Low).await
//! }
//! ```

pub mod clock;
pub mod error;
pub mod lcd;
pub mod matrix;
pub mod mock;
pub mod timer;
pub mod traits;

// Re-export commonly used types for convenience
pub use clock::TokioClock;
pub use error::{HardwareError, Result};
pub use lcd::VirtualLcd;
pub use matrix::MatrixKeypad;
pub use timer::Countdown;
pub use traits::{Clock, DigitalInput, DigitalOutput, Display, Keypad};
