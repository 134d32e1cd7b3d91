//! PIN entry and verification.
//!
//! The verifier owns the input buffer and the secret. An attempt always
//! starts from an empty buffer, collects exactly [`PIN_LENGTH`] keys and
//! compares them against the secret. There is no cancel key and no lockout:
//! [`CredentialVerifier::authenticate`] only returns once the right code was
//! typed, or when a peripheral fails.

use std::time::Duration;

use parkade_core::{
    ControllerConfig, Key, Pin,
    constants::{INVALID_PIN_DWELL_MS, MSG_ENTER_PIN, MSG_INVALID_PIN, PIN_LENGTH, POLL_INTERVAL_MS},
};
use parkade_hardware::{
    Result,
    traits::{Clock, Display, Keypad},
};
use tracing::{debug, info, warn};

/// Collects keypad input and checks it against a fixed secret.
#[derive(Debug)]
pub struct CredentialVerifier {
    secret: Pin,
    buffer: Vec<Key>,
    poll_interval: Duration,
    invalid_dwell: Duration,
    failed_attempts: u64,
}

impl CredentialVerifier {
    /// Create a verifier for `secret` with the default timings.
    pub fn new(secret: Pin) -> Self {
        Self {
            secret,
            buffer: Vec::with_capacity(PIN_LENGTH),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            invalid_dwell: Duration::from_millis(INVALID_PIN_DWELL_MS),
            failed_attempts: 0,
        }
    }

    /// Create a verifier from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPin` if the configured PIN is malformed.
    pub fn from_config(config: &ControllerConfig) -> parkade_core::Result<Self> {
        Ok(Self::new(config.pin()?).with_timing(
            config.timing.poll_interval(),
            config.timing.invalid_pin_dwell(),
        ))
    }

    /// Override the empty-scan poll interval and the "Invalid PIN" dwell.
    pub fn with_timing(mut self, poll_interval: Duration, invalid_dwell: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.invalid_dwell = invalid_dwell;
        self
    }

    /// Prompt until the secret is entered.
    ///
    /// Returns the number of attempts it took, including the successful one.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad or the display fails. The buffer is
    /// left as it was at the point of failure and cleared by the next call.
    pub async fn authenticate<K, D, C>(
        &mut self,
        keypad: &mut K,
        display: &mut D,
        clock: &mut C,
    ) -> Result<u32>
    where
        K: Keypad,
        D: Display,
        C: Clock,
    {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            self.collect(keypad, display, clock).await?;

            if self.secret.matches(&self.buffer) {
                self.buffer.clear();
                info!(attempts, "PIN accepted");
                return Ok(attempts);
            }

            self.buffer.clear();
            self.failed_attempts += 1;
            warn!(
                attempts,
                failed_attempts = self.failed_attempts,
                "Invalid PIN entered"
            );

            display.show(MSG_INVALID_PIN, "").await?;
            clock.wait_for(self.invalid_dwell).await;
        }
    }

    /// One attempt: prompt and fill the buffer.
    async fn collect<K, D, C>(&mut self, keypad: &mut K, display: &mut D, clock: &mut C) -> Result<()>
    where
        K: Keypad,
        D: Display,
        C: Clock,
    {
        self.buffer.clear();
        display.show(MSG_ENTER_PIN, "").await?;

        while self.buffer.len() < PIN_LENGTH {
            match keypad.scan().await? {
                Some(key) => {
                    self.buffer.push(key);
                    debug!(position = self.buffer.len(), "Key collected");

                    let echo: String = self.buffer.iter().map(|key| key.as_char()).collect();
                    display.show(MSG_ENTER_PIN, &echo).await?;
                }
                None => clock.wait_for(self.poll_interval).await,
            }
        }

        Ok(())
    }

    /// Total wrong codes entered since the verifier was created.
    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts
    }

    /// Keys collected in the current attempt.
    pub fn buffered(&self) -> &[Key] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkade_hardware::{
        HardwareError, VirtualLcd,
        mock::{MockKeypad, VirtualClock},
    };
    use std::collections::VecDeque;

    /// Keypad that plays back scan results, including empty scans.
    struct ScriptedKeypad(VecDeque<Option<Key>>);

    impl Keypad for ScriptedKeypad {
        async fn scan(&mut self) -> Result<Option<Key>> {
            self.0
                .pop_front()
                .ok_or_else(|| HardwareError::disconnected("Script exhausted"))
        }
    }

    #[tokio::test]
    async fn test_correct_pin_first_try() {
        let mut verifier = CredentialVerifier::new(Pin::default());
        let mut keypad = MockKeypad::with_presses("123").unwrap();
        let mut lcd = VirtualLcd::default();
        let clock = VirtualClock::new();

        let attempts = verifier
            .authenticate(&mut keypad, &mut lcd, &mut clock.clone())
            .await
            .unwrap();

        assert_eq!(attempts, 1);
        assert_eq!(verifier.failed_attempts(), 0);
        assert!(verifier.buffered().is_empty());
        assert_eq!(lcd.count_frames_with(MSG_INVALID_PIN), 0);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_echoes_each_key() {
        let mut verifier = CredentialVerifier::new(Pin::default());
        let mut keypad = MockKeypad::with_presses("123").unwrap();
        let mut lcd = VirtualLcd::default();

        verifier
            .authenticate(&mut keypad, &mut lcd, &mut VirtualClock::new())
            .await
            .unwrap();

        let frames: Vec<_> = lcd.frames().collect();
        assert_eq!(
            frames,
            vec![
                (MSG_ENTER_PIN, ""),
                (MSG_ENTER_PIN, "1"),
                (MSG_ENTER_PIN, "12"),
                (MSG_ENTER_PIN, "123"),
            ]
        );
    }

    #[tokio::test]
    async fn test_wrong_pin_then_correct() {
        let mut verifier = CredentialVerifier::new(Pin::default());
        let mut keypad = MockKeypad::with_presses("124123").unwrap();
        let mut lcd = VirtualLcd::default();
        let clock = VirtualClock::new();

        let attempts = verifier
            .authenticate(&mut keypad, &mut lcd, &mut clock.clone())
            .await
            .unwrap();

        assert_eq!(attempts, 2);
        assert_eq!(verifier.failed_attempts(), 1);
        assert_eq!(lcd.count_frames_with(MSG_INVALID_PIN), 1);
        // Two prompts, each followed by three echoes.
        assert_eq!(lcd.count_frames_with(MSG_ENTER_PIN), 8);
        assert_eq!(clock.waits(), vec![Duration::from_millis(1000)]);
        // The keypad was not scanned past the sixth key.
        assert_eq!(keypad.scans(), 6);
    }

    #[tokio::test]
    async fn test_symbol_keys_never_match() {
        let mut verifier = CredentialVerifier::new(Pin::default());
        let mut keypad = MockKeypad::with_presses("#23*12123").unwrap();
        let mut lcd = VirtualLcd::default();

        let attempts = verifier
            .authenticate(&mut keypad, &mut lcd, &mut VirtualClock::new())
            .await
            .unwrap();

        assert_eq!(attempts, 3);
        assert_eq!(verifier.failed_attempts(), 2);
    }

    #[tokio::test]
    async fn test_empty_scans_wait_poll_interval() {
        let script = [
            None,
            Some(Key::Digit(1)),
            None,
            None,
            Some(Key::Digit(2)),
            Some(Key::Digit(3)),
        ];
        let mut keypad = ScriptedKeypad(script.into_iter().collect());
        let mut verifier = CredentialVerifier::new(Pin::default())
            .with_timing(Duration::from_millis(7), Duration::from_millis(500));
        let clock = VirtualClock::new();

        verifier
            .authenticate(&mut keypad, &mut VirtualLcd::default(), &mut clock.clone())
            .await
            .unwrap();

        assert_eq!(clock.waits(), vec![Duration::from_millis(7); 3]);
    }

    #[tokio::test]
    async fn test_keypad_fault_propagates() {
        let mut verifier = CredentialVerifier::new(Pin::default());
        let mut keypad = MockKeypad::with_presses("12").unwrap();

        let result = verifier
            .authenticate(&mut keypad, &mut VirtualLcd::default(), &mut VirtualClock::new())
            .await;

        assert!(matches!(result, Err(HardwareError::Disconnected { .. })));
        assert_eq!(verifier.buffered().len(), 2);
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_pin() {
        let config = ControllerConfig::from_json(
            r#"{ "pin": "907", "timing": { "invalid_pin_dwell_ms": 250 } }"#,
        )
        .unwrap();
        let mut verifier = CredentialVerifier::from_config(&config).unwrap();
        let mut keypad = MockKeypad::with_presses("123907").unwrap();
        let clock = VirtualClock::new();

        let attempts = verifier
            .authenticate(&mut keypad, &mut VirtualLcd::default(), &mut clock.clone())
            .await
            .unwrap();

        assert_eq!(attempts, 2);
        assert_eq!(clock.elapsed(), Duration::from_millis(250));
    }
}
