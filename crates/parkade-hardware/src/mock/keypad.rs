//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated keypad device that can be controlled
//! programmatically for testing without requiring physical hardware.

use parkade_core::Key;
use tokio::sync::mpsc;

use crate::{HardwareError, Result, traits::Keypad};

/// Mock keypad device for testing and development.
///
/// Keys sent through a [`MockKeypadHandle`] are queued and handed out one
/// per [`scan`](Keypad::scan). A scan with an empty queue reports no key.
///
/// # Examples
///
/// ```
/// use parkade_core::Key;
/// use parkade_hardware::mock::MockKeypad;
/// use parkade_hardware::traits::Keypad;
///
/// #[tokio::main]
/// async fn main() -> parkade_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.press(Key::Digit(1))?;
///     handle.press(Key::Hash)?;
///
///     assert_eq!(keypad.scan().await?, Some(Key::Digit(1)));
///     assert_eq!(keypad.scan().await?, Some(Key::Hash));
///     assert_eq!(keypad.scan().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated presses
    key_rx: mpsc::UnboundedReceiver<Key>,

    /// Number of scans performed
    scans: usize,
}

impl MockKeypad {
    /// Create a new mock keypad.
    ///
    /// Returns a tuple of (MockKeypad, MockKeypadHandle) where the handle
    /// can be used to simulate key presses.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::unbounded_channel();

        let keypad = Self { key_rx, scans: 0 };
        let handle = MockKeypadHandle { key_tx };

        (keypad, handle)
    }

    /// Create a mock keypad with `symbols` already queued.
    ///
    /// The handle is dropped, so once the queue drains every further scan
    /// fails as disconnected instead of reporting no key.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol is not part of the keypad layout.
    pub fn with_presses(symbols: &str) -> Result<Self> {
        let (keypad, handle) = Self::new();
        handle.type_symbols(symbols)?;
        Ok(keypad)
    }

    /// Discard every queued press without scanning.
    ///
    /// Returns how many presses were dropped.
    pub fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while self.key_rx.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }

    /// Number of scans performed so far.
    pub fn scans(&self) -> usize {
        self.scans
    }
}

impl Default for MockKeypad {
    fn default() -> Self {
        Self::new().0
    }
}

impl Keypad for MockKeypad {
    async fn scan(&mut self) -> Result<Option<Key>> {
        self.scans += 1;
        match self.key_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(HardwareError::disconnected("Keypad input channel closed"))
            }
        }
    }
}

/// Handle for controlling a mock keypad.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated presses
    key_tx: mpsc::UnboundedSender<Key>,
}

impl MockKeypadHandle {
    /// Queue a single key press.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub fn press(&self, key: Key) -> Result<()> {
        self.key_tx
            .send(key)
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Queue one press per symbol, e.g. `"12#"`.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol is not on the keypad or the keypad has
    /// been dropped.
    pub fn type_symbols(&self, symbols: &str) -> Result<()> {
        for c in symbols.chars() {
            let key = Key::from_char(c).map_err(|e| HardwareError::invalid_data(e.to_string()))?;
            self.press(key)?;
        }
        Ok(())
    }
}
