//! Collaborator trait definitions.
//!
//! These traits are the whole surface the controller sees of the physical
//! world: pins, the keypad, the character display and a way to wait. The
//! controller never touches a register directly, so the same logic runs on
//! a board, in the terminal simulator and against the mocks in tests.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use std::time::Duration;

use parkade_core::{Key, Level};

use crate::error::Result;

/// A digital input line, such as a presence sensor or a keypad column.
pub trait DigitalInput: Send + Sync {
    /// Sample the current level of the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be read.
    async fn read(&mut self) -> Result<Level>;
}

/// A digital output line, such as a motor driver input or a keypad row.
pub trait DigitalOutput: Send + Sync {
    /// Drive the line to `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be driven.
    async fn set(&mut self, level: Level) -> Result<()>;
}

/// Keypad abstraction.
///
/// # Examples
///
/// ```no_run
/// use parkade_hardware::traits::Keypad;
/// use parkade_hardware::Result;
/// use parkade_core::Key;
///
/// async fn next_key<K: Keypad>(keypad: &mut K) -> Result<Key> {
///     loop {
///         if let Some(key) = keypad.scan().await? {
///             return Ok(key);
///         }
///     }
/// }
/// ```
pub trait Keypad: Send + Sync {
    /// Scan the keypad once.
    ///
    /// Returns the debounced key if one was pressed and released during the
    /// scan, or `None` if no key is down. A scan never waits for a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a line cannot be
    /// driven or read.
    async fn scan(&mut self) -> Result<Option<Key>>;
}

/// Two-line character display.
pub trait Display: Send + Sync {
    /// Replace the whole display content with two lines of ASCII text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not ASCII or the device does not
    /// answer.
    async fn show(&mut self, line1: &str, line2: &str) -> Result<()>;
}

/// Time source for every wait the controller performs.
pub trait Clock: Send + Sync {
    /// Return once `duration` has elapsed.
    async fn wait_for(&mut self, duration: Duration);
}
