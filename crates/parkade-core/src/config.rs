//! Controller configuration.
//!
//! Every field has a default matching the compiled-in constants, so an empty
//! JSON object is a valid configuration. The expected layout is:
//!
//! ```json
//! {
//!   "total_slots": 5,
//!   "pin": "123",
//!   "sensors_active_low": true,
//!   "timing": {
//!     "debounce_ms": 20,
//!     "poll_interval_ms": 10,
//!     "invalid_pin_dwell_ms": 1000,
//!     "full_dwell_ms": 2000,
//!     "gate_open_ms": 5000,
//!     "timer_tick_hz": 921600
//!   }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    CapacityLedger, Error, Pin, Result,
    constants::{
        DEFAULT_PIN, GATE_OPEN_MS, INVALID_PIN_DWELL_MS, MAX_TOTAL_SLOTS, PARKING_FULL_DWELL_MS,
        POLL_INTERVAL_MS, SENSOR_DEBOUNCE_MS, TIMER_TICK_HZ, TOTAL_SLOTS,
    },
};

/// Top-level controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Parking capacity (1-99).
    pub total_slots: u8,

    /// Secret PIN, exactly three digits.
    pub pin: String,

    /// Presence sensors pull their line low when a vehicle is present.
    pub sensors_active_low: bool,

    /// Wait and dwell durations.
    pub timing: TimingConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            total_slots: TOTAL_SLOTS,
            pin: DEFAULT_PIN.to_string(),
            sensors_active_low: true,
            timing: TimingConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, `Error::ConfigFormat`
    /// if it is not valid JSON for this layout, and any error from
    /// [`validate`](Self::validate).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading controller configuration");

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;

        info!(
            path = %path.display(),
            total_slots = config.total_slots,
            gate_open_ms = config.timing.gate_open_ms,
            "Loaded controller configuration"
        );
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string.
    ///
    /// # Errors
    /// See [`from_file`](Self::from_file).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range.
    ///
    /// # Errors
    /// Returns `Error::Config` for out-of-range values and
    /// `Error::InvalidPin` for a malformed PIN.
    pub fn validate(&self) -> Result<()> {
        if self.total_slots == 0 || self.total_slots > MAX_TOTAL_SLOTS {
            return Err(Error::Config(format!(
                "total_slots must be 1-{MAX_TOTAL_SLOTS}, got {}",
                self.total_slots
            )));
        }
        self.pin()?;
        self.timing.validate()
    }

    /// The configured secret.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` if the configured string is malformed.
    pub fn pin(&self) -> Result<Pin> {
        Pin::new(&self.pin)
    }

    /// A fresh ledger with every slot free.
    ///
    /// # Errors
    /// Returns `Error::InvalidCapacity` if `total_slots` is zero.
    pub fn ledger(&self) -> Result<CapacityLedger> {
        CapacityLedger::new(self.total_slots)
    }
}

/// Durations of every wait the controller performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub debounce_ms: u64,
    pub poll_interval_ms: u64,
    pub invalid_pin_dwell_ms: u64,
    pub full_dwell_ms: u64,
    pub gate_open_ms: u64,
    pub timer_tick_hz: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: SENSOR_DEBOUNCE_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            invalid_pin_dwell_ms: INVALID_PIN_DWELL_MS,
            full_dwell_ms: PARKING_FULL_DWELL_MS,
            gate_open_ms: GATE_OPEN_MS,
            timer_tick_hz: TIMER_TICK_HZ,
        }
    }
}

impl TimingConfig {
    /// # Errors
    /// Returns `Error::Config` if the gate window, the poll interval or the
    /// timer tick rate is zero.
    pub fn validate(&self) -> Result<()> {
        if self.gate_open_ms == 0 {
            return Err(Error::Config("gate_open_ms must be non-zero".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be non-zero".into()));
        }
        if self.timer_tick_hz == 0 {
            return Err(Error::Config("timer_tick_hz must be non-zero".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn invalid_pin_dwell(&self) -> Duration {
        Duration::from_millis(self.invalid_pin_dwell_ms)
    }

    #[must_use]
    pub fn full_dwell(&self) -> Duration {
        Duration::from_millis(self.full_dwell_ms)
    }

    #[must_use]
    pub fn gate_open(&self) -> Duration {
        Duration::from_millis(self.gate_open_ms)
    }
}
