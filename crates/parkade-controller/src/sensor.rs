//! Presence sensors.

use parkade_core::{Level, Sensor};
use parkade_hardware::{Result, traits::DigitalInput};

/// A presence input with a known active level.
///
/// The loop detectors at the gates pull their line low while a vehicle is
/// present, so [`PresenceSensor::active_low`] is the usual constructor.
#[derive(Debug)]
pub struct PresenceSensor<I> {
    sensor: Sensor,
    input: I,
    active_level: Level,
}

impl<I: DigitalInput> PresenceSensor<I> {
    pub fn new(sensor: Sensor, input: I, active_level: Level) -> Self {
        Self {
            sensor,
            input,
            active_level,
        }
    }

    pub fn active_low(sensor: Sensor, input: I) -> Self {
        Self::new(sensor, input, Level::Low)
    }

    /// Sample the input once.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    pub async fn is_active(&mut self) -> Result<bool> {
        Ok(self.input.read().await? == self.active_level)
    }

    pub fn sensor(&self) -> Sensor {
        self.sensor
    }

    pub fn active_level(&self) -> Level {
        self.active_level
    }

    pub fn input(&self) -> &I {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkade_hardware::mock::ScriptedInput;

    #[tokio::test]
    async fn test_active_low_sensor() {
        let input = ScriptedInput::new([Level::Low, Level::High]);
        let mut sensor = PresenceSensor::active_low(Sensor::Entry, input);

        assert!(sensor.is_active().await.unwrap());
        assert!(!sensor.is_active().await.unwrap());
        assert_eq!(sensor.sensor(), Sensor::Entry);
    }

    #[tokio::test]
    async fn test_active_high_sensor() {
        let input = ScriptedInput::constant(Level::High);
        let mut sensor = PresenceSensor::new(Sensor::Exit, input, Level::High);

        assert!(sensor.is_active().await.unwrap());
        assert_eq!(sensor.active_level(), Level::High);
    }
}
