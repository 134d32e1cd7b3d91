//! Capacity ledger.
//!
//! The ledger is the single piece of shared mutable state in the controller:
//! the number of free parking slots. It is bounded on both sides, and both
//! mutations saturate instead of failing.
//!
//! # Examples
//!
//! ```
//! use parkade_core::CapacityLedger;
//!
//! let mut ledger = CapacityLedger::new(2).unwrap();
//! assert!(ledger.try_consume_slot());
//! assert!(ledger.try_consume_slot());
//! assert!(!ledger.try_consume_slot());
//! assert_eq!(ledger.available(), 0);
//!
//! ledger.release_slot();
//! ledger.release_slot();
//! ledger.release_slot();
//! assert_eq!(ledger.available(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result, constants::TOTAL_SLOTS};

/// Bounded counter of free slots, always in `0..=total`.
///
/// Deserialized values go through [`CapacityLedger::with_available`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLedger")]
pub struct CapacityLedger {
    available: u8,
    total: u8,
}

/// Unchecked wire form of [`CapacityLedger`].
#[derive(Deserialize)]
struct RawLedger {
    available: u8,
    total: u8,
}

impl TryFrom<RawLedger> for CapacityLedger {
    type Error = Error;

    fn try_from(raw: RawLedger) -> Result<Self> {
        Self::with_available(raw.total, raw.available)
    }
}

impl CapacityLedger {
    /// Create a ledger with every slot free.
    ///
    /// # Errors
    /// Returns `Error::InvalidCapacity` if `total` is zero.
    pub fn new(total: u8) -> Result<Self> {
        Self::with_available(total, total)
    }

    /// Create a ledger at an arbitrary fill level.
    ///
    /// # Errors
    /// Returns `Error::InvalidCapacity` if `total` is zero or `available`
    /// exceeds `total`.
    pub fn with_available(total: u8, available: u8) -> Result<Self> {
        if total == 0 || available > total {
            return Err(Error::InvalidCapacity { available, total });
        }
        Ok(Self { available, total })
    }

    /// Take one free slot for an entering vehicle.
    ///
    /// Returns `false`, leaving the ledger untouched, when no slot is free.
    pub fn try_consume_slot(&mut self) -> bool {
        if self.available > 0 {
            self.available -= 1;
            true
        } else {
            false
        }
    }

    /// Give a slot back for a leaving vehicle.
    ///
    /// Saturates at the total capacity. Exits are never refused, so a
    /// release on an empty lot is a no-op.
    pub fn release_slot(&mut self) {
        if self.available < self.total {
            self.available += 1;
        }
    }

    #[must_use]
    pub fn available(&self) -> u8 {
        self.available
    }

    #[must_use]
    pub fn total(&self) -> u8 {
        self.total
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> u8 {
        self.total - self.available
    }

    /// No free slot left.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.available == 0
    }

    /// Every slot is free.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.available == self.total
    }
}

impl Default for CapacityLedger {
    fn default() -> Self {
        Self {
            available: TOTAL_SLOTS,
            total: TOTAL_SLOTS,
        }
    }
}
