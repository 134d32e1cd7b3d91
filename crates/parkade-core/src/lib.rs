//! Core domain types for the Parkade parking gate controller.
//!
//! This crate holds everything the controller needs that does not touch
//! hardware: the fixed constants of the facility, the capacity ledger, the
//! credential type, and configuration loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod types;

pub use config::{ControllerConfig, TimingConfig};
pub use error::{Error, Result};
pub use ledger::CapacityLedger;
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
