use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Invalid PIN: {0}")]
    InvalidPin(String),

    #[error("Invalid key symbol: {0:?}")]
    InvalidKey(char),

    // Ledger errors
    #[error("Invalid capacity: {available} available of {total} total")]
    InvalidCapacity { available: u8, total: u8 },

    // State machine errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed configuration file: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
