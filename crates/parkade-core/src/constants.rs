//! Core constants for the Parkade gate controller.
//!
//! This module defines the fixed parameters of the facility: capacity, the
//! credential, display texts and the timing of every wait the controller
//! performs. Timing constants are expressed in milliseconds so they can be
//! overridden one-to-one from the configuration file (see
//! [`crate::config::TimingConfig`]).
//!
//! # Usage
//!
//! ```
//! use parkade_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(TOTAL_SLOTS, 5);
//! assert_eq!(PIN_LENGTH, DEFAULT_PIN.len());
//!
//! let window = Duration::from_millis(GATE_OPEN_MS);
//! assert_eq!(window.as_secs(), 5);
//! ```

// ============================================================================
// Capacity
// ============================================================================

/// Total parking capacity of the facility.
///
/// The capacity ledger starts full of free slots at this value on every
/// power-up; nothing is persisted.
///
/// # Value: 5 slots
pub const TOTAL_SLOTS: u8 = 5;

/// Largest capacity the controller accepts.
///
/// The capacity display renders the free slot count as two digits.
///
/// # Value: 99 slots
pub const MAX_TOTAL_SLOTS: u8 = 99;

// ============================================================================
// Credential
// ============================================================================

/// Number of keypresses that make up a credential.
///
/// # Value: 3 keys
pub const PIN_LENGTH: usize = 3;

/// Secret PIN compiled into the controller.
///
/// # Value: "123"
pub const DEFAULT_PIN: &str = "123";

// ============================================================================
// Timing (milliseconds)
// ============================================================================

/// Debounce interval for the presence sensors.
///
/// A sensor must read active both before and after this wait to count as a
/// request. The same wait is applied after the sensor is released.
///
/// # Value: 20 ms
pub const SENSOR_DEBOUNCE_MS: u64 = 20;

/// Pause between two empty polls of the sensors or the keypad.
///
/// # Value: 10 ms
pub const POLL_INTERVAL_MS: u64 = 10;

/// How long "Invalid PIN" stays on the display before re-prompting.
///
/// # Value: 1000 ms
pub const INVALID_PIN_DWELL_MS: u64 = 1000;

/// How long "PARKING FULL" stays on the display when entry is refused.
///
/// # Value: 2000 ms
pub const PARKING_FULL_DWELL_MS: u64 = 2000;

/// Gate open window.
///
/// The gate motor is driven forward for exactly this long on every
/// open cycle, entry or exit.
///
/// # Value: 5000 ms
pub const GATE_OPEN_MS: u64 = 5000;

/// Tick rate of the gate countdown timer.
///
/// An 11.0592 MHz crystal with the classic divide-by-12 machine cycle.
///
/// # Value: 921 600 Hz
pub const TIMER_TICK_HZ: u32 = 921_600;

/// Settle time after selecting a keypad row, before reading the columns.
///
/// # Value: 2 ms
pub const KEYPAD_ROW_SETTLE_MS: u64 = 2;

/// Debounce after a keypad key is released.
///
/// # Value: 10 ms
pub const KEYPAD_DEBOUNCE_MS: u64 = 10;

// ============================================================================
// Display
// ============================================================================

/// Number of lines on the character display.
pub const DISPLAY_LINES: usize = 2;

/// Number of characters per display line.
pub const DISPLAY_COLUMNS: usize = 16;

/// Header of the capacity screen.
pub const MSG_AVAILABLE_SLOTS: &str = "Available Slots:";

/// Shown when no slot is free.
pub const MSG_PARKING_FULL: &str = "PARKING FULL";

/// Credential prompt.
pub const MSG_ENTER_PIN: &str = "Enter PIN:";

/// Shown after a credential mismatch.
pub const MSG_INVALID_PIN: &str = "Invalid PIN";
