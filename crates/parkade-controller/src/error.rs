//! Controller error type.
//!
//! The controller has no recoverable errors of its own: a wrong PIN and a
//! full lot are normal flow. What remains are faults reported by the
//! hardware, invalid configuration, and misuse of the state machine.

use parkade_hardware::HardwareError;
use thiserror::Error;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

#[derive(Debug, Error)]
pub enum ControllerError {
    /// A collaborator reported a fault; the controller does not recover.
    #[error("Hardware fault: {0}")]
    Hardware(#[from] HardwareError),

    /// Configuration or state machine error.
    #[error(transparent)]
    Core(#[from] parkade_core::Error),
}

impl ControllerError {
    /// Returns `true` if this error came from a peripheral.
    pub fn is_hardware_fault(&self) -> bool {
        matches!(self, ControllerError::Hardware(_))
    }
}
