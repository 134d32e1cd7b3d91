use crate::{Result, constants::PIN_LENGTH, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two independently actuated barriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    Entry,
    Exit,
}

impl Gate {
    /// Returns `true` if this is the entry gate.
    #[inline]
    #[must_use]
    pub fn is_entry(self) -> bool {
        matches!(self, Gate::Entry)
    }

    /// Returns `true` if this is the exit gate.
    #[inline]
    #[must_use]
    pub fn is_exit(self) -> bool {
        matches!(self, Gate::Exit)
    }

    /// The presence sensor that requests this gate.
    #[must_use]
    pub fn sensor(self) -> Sensor {
        match self {
            Gate::Entry => Sensor::Entry,
            Gate::Exit => Sensor::Exit,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Gate::Entry => write!(f, "Entry"),
            Gate::Exit => write!(f, "Exit"),
        }
    }
}

/// Presence sensor in front of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensor {
    Entry,
    Exit,
}

impl Sensor {
    /// The gate this sensor requests.
    #[must_use]
    pub fn gate(self) -> Gate {
        match self {
            Sensor::Entry => Gate::Entry,
            Sensor::Exit => Gate::Exit,
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sensor::Entry => write!(f, "EntrySensor"),
            Sensor::Exit => write!(f, "ExitSensor"),
        }
    }
}

/// Electrical level of a digital pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// The opposite level.
    #[inline]
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    #[inline]
    #[must_use]
    pub fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// A symbol of the 4x3 keypad.
///
/// Serialized as its printable symbol, so only `0-9`, `*` and `#` load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Key {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Star key (*).
    Star,

    /// Hash/pound key (#).
    Hash,
}

impl Key {
    /// Create a digit key.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` if the digit is greater than 9.
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(Error::InvalidKey(char::from(b'0'.saturating_add(d))));
        }
        Ok(Key::Digit(d))
    }

    /// Parse a keypad symbol.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` for anything outside `0-9`, `*` and `#`.
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '*' => Ok(Key::Star),
            '#' => Ok(Key::Hash),
            '0'..='9' => Ok(Key::Digit(c as u8 - b'0')),
            other => Err(Error::InvalidKey(other)),
        }
    }

    /// The printable symbol for this key.
    ///
    /// A `Digit` built directly with a value above 9 prints as `?`.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Key::Digit(d) => char::from_digit(u32::from(d), 10).unwrap_or('?'),
            Key::Star => '*',
            Key::Hash => '#',
        }
    }

    /// Get the digit value if this is a digit key.
    #[must_use]
    pub fn as_digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) => Some(d),
            _ => None,
        }
    }
}

impl TryFrom<char> for Key {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        Key::from_char(c)
    }
}

impl From<Key> for char {
    fn from(key: Key) -> Self {
        key.as_char()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The secret credential: exactly [`PIN_LENGTH`] decimal digits.
///
/// The `Debug` output is redacted so the secret never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin([Key; PIN_LENGTH]);

impl Pin {
    /// Create a PIN from a string of digits.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` unless the input is exactly
    /// [`PIN_LENGTH`] ASCII digits.
    pub fn new(digits: &str) -> Result<Self> {
        if digits.chars().count() != PIN_LENGTH {
            return Err(Error::InvalidPin(format!(
                "PIN must be {PIN_LENGTH} digits, got {}",
                digits.chars().count()
            )));
        }

        let mut keys = [Key::Digit(0); PIN_LENGTH];
        for (slot, c) in keys.iter_mut().zip(digits.chars()) {
            if !c.is_ascii_digit() {
                return Err(Error::InvalidPin(format!("PIN must be numeric, got {c:?}")));
            }
            *slot = Key::from_char(c)?;
        }

        Ok(Pin(keys))
    }

    /// Compare an entered key sequence against the secret.
    ///
    /// Positions are compared in order and the comparison stops at the
    /// first mismatch. A sequence of the wrong length never matches.
    #[must_use]
    pub fn matches(&self, entered: &[Key]) -> bool {
        if entered.len() != PIN_LENGTH {
            return false;
        }
        self.0.iter().zip(entered).all(|(secret, key)| secret == key)
    }

    /// The secret keys.
    #[must_use]
    pub fn keys(&self) -> &[Key; PIN_LENGTH] {
        &self.0
    }
}

impl Default for Pin {
    fn default() -> Self {
        Pin([Key::Digit(1), Key::Digit(2), Key::Digit(3)])
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pin(***)")
    }
}

impl std::str::FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Pin::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_PIN;
    use rstest::rstest;

    fn keys(s: &str) -> Vec<Key> {
        s.chars().map(|c| Key::from_char(c).unwrap()).collect()
    }

    #[test]
    fn test_out_of_range_digit_prints_placeholder() {
        assert_eq!(Key::Digit(208).as_char(), '?');
        assert_eq!(Key::Digit(10).to_string(), "?");
        assert_eq!(Key::Digit(9).as_char(), '9');
    }

    #[rstest]
    #[case(r#""7""#, Key::Digit(7))]
    #[case(r#""*""#, Key::Star)]
    #[case(r##""#""##, Key::Hash)]
    fn test_key_deserializes_from_symbol(#[case] json: &str, #[case] expected: Key) {
        assert_eq!(serde_json::from_str::<Key>(json).unwrap(), expected);
    }

    #[rstest]
    #[case(r#""A""#)]
    #[case(r#"{"Digit":208}"#)]
    fn test_key_deserialize_rejects_unknown_symbol(#[case] json: &str) {
        assert!(serde_json::from_str::<Key>(json).is_err());
    }

    #[test]
    fn test_key_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Key::Digit(4)).unwrap(), r#""4""#);
    }

    #[test]
    fn test_default_pin_matches_constant() {
        assert_eq!(Pin::default(), Pin::new(DEFAULT_PIN).unwrap());
    }

    #[rstest]
    #[case("123", true)]
    #[case("124", false)]
    #[case("023", false)]
    #[case("12#", false)]
    #[case("*23", false)]
    fn test_pin_matches(#[case] entered: &str, #[case] expected: bool) {
        let pin = Pin::new("123").unwrap();
        assert_eq!(pin.matches(&keys(entered)), expected);
    }

    #[test]
    fn test_pin_rejects_wrong_length_input() {
        let pin = Pin::new("123").unwrap();
        assert!(!pin.matches(&keys("12")));
        assert!(!pin.matches(&keys("1234")));
    }

    #[rstest]
    #[case("")]
    #[case("12")]
    #[case("1234")]
    #[case("12a")]
    #[case("1*3")]
    fn test_pin_invalid(#[case] input: &str) {
        assert!(matches!(Pin::new(input), Err(Error::InvalidPin(_))));
    }

    #[test]
    fn test_pin_debug_is_redacted() {
        let pin = Pin::new("987").unwrap();
        assert_eq!(format!("{pin:?}"), "Pin(***)");
    }

    #[rstest]
    #[case('0', Key::Digit(0))]
    #[case('9', Key::Digit(9))]
    #[case('*', Key::Star)]
    #[case('#', Key::Hash)]
    fn test_key_from_char(#[case] c: char, #[case] expected: Key) {
        let key = Key::from_char(c).unwrap();
        assert_eq!(key, expected);
        assert_eq!(key.as_char(), c);
    }

    #[test]
    fn test_key_invalid() {
        assert!(Key::from_char('A').is_err());
        assert!(Key::digit(10).is_err());
        assert_eq!(Key::digit(7).unwrap().as_digit(), Some(7));
        assert_eq!(Key::Star.as_digit(), None);
    }

    #[test]
    fn test_gate_sensor_pairing() {
        assert_eq!(Gate::Entry.sensor(), Sensor::Entry);
        assert_eq!(Gate::Exit.sensor(), Sensor::Exit);
        assert_eq!(Sensor::Entry.gate(), Gate::Entry);
        assert_eq!(Sensor::Exit.gate(), Gate::Exit);
        assert!(Gate::Entry.is_entry());
        assert!(Gate::Exit.is_exit());
    }

    #[test]
    fn test_level() {
        assert_eq!(Level::Low.inverted(), Level::High);
        assert_eq!(Level::from(true), Level::High);
        assert!(Level::Low.is_low());
        assert!(!Level::Low.is_high());
    }
}
