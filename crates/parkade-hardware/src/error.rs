//! Error types for hardware operations.
//!
//! The controller has no recovery path for any of these: a stuck sensor, a
//! dead keypad or a display that stopped answering is surfaced to the caller
//! as-is.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from or sent to a device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Display line index out of range.
    #[error("Invalid display line {line} (max {max})")]
    InvalidLine { line: usize, max: usize },

    /// Device or timer configuration error.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("Keypad");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: Keypad");
    }

    #[test]
    fn test_communication_error() {
        let error = HardwareError::communication("Bus stuck low");
        assert_eq!(error.to_string(), "Communication error: Bus stuck low");
    }

    #[test]
    fn test_invalid_line_error() {
        let error = HardwareError::InvalidLine { line: 4, max: 1 };
        assert_eq!(error.to_string(), "Invalid display line 4 (max 1)");
    }

    #[test]
    fn test_configuration_error() {
        let error = HardwareError::configuration("tick rate is zero");
        assert!(matches!(error, HardwareError::ConfigurationError { .. }));
        assert_eq!(error.to_string(), "Configuration error: tick rate is zero");
    }
}
