//! Console commands.
//!
//! One command per line on stdin:
//!
//! ```text
//! entry on|off     vehicle arrives at / leaves the entry loop
//! exit on|off      vehicle arrives at / leaves the exit loop
//! key <symbols>    type on the keypad, e.g. `key 123`
//! status           print ledger, state and counters
//! help             list commands
//! quit             stop the simulator
//! ```

use std::str::FromStr;

use parkade_core::{Key, Sensor};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sensor { sensor: Sensor, present: bool },
    Keys(Vec<Key>),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Expected `on` or `off` after `{0}`")]
    ExpectedOnOff(&'static str),

    #[error("Expected key symbols after `key`")]
    MissingKeys,

    #[error("Not a keypad symbol: {0:?}")]
    InvalidKey(char),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();

        match verb.as_str() {
            "entry" => parse_sensor(Sensor::Entry, "entry", words.next()),
            "exit" => parse_sensor(Sensor::Exit, "exit", words.next()),
            "key" | "keys" => {
                let symbols: String = words.collect();
                if symbols.is_empty() {
                    return Err(CommandError::MissingKeys);
                }
                symbols
                    .chars()
                    .map(|c| Key::from_char(c).map_err(|_| CommandError::InvalidKey(c)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Command::Keys)
            }
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

fn parse_sensor(
    sensor: Sensor,
    verb: &'static str,
    arg: Option<&str>,
) -> Result<Command, CommandError> {
    let present = match arg.map(str::to_ascii_lowercase).as_deref() {
        Some("on") => true,
        Some("off") => false,
        _ => return Err(CommandError::ExpectedOnOff(verb)),
    };
    Ok(Command::Sensor { sensor, present })
}

pub const HELP: &str = "\
commands:
  entry on|off     vehicle on / off the entry loop
  exit on|off      vehicle on / off the exit loop
  key <symbols>    press keys, e.g. `key 123`
  status           show capacity, state and counters
  quit             stop the simulator";
