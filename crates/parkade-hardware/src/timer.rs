//! Gate window countdown.
//!
//! The gate window is measured with a 16-bit up-counting hardware timer:
//! the counter is preloaded so that, after a fixed number of overflows,
//! exactly the requested number of ticks has elapsed. [`Countdown`] does the
//! calibration (reload value and overflow count) and waits out each overflow
//! period on a [`Clock`].
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use parkade_hardware::timer::Countdown;
//!
//! // 50 ms at 1 MHz: one overflow from a reload of 0x3CB0.
//! let countdown = Countdown::new(Duration::from_millis(50), 1_000_000).unwrap();
//! assert_eq!(countdown.first_reload(), 0x3CB0);
//! assert_eq!(countdown.overflows(), 1);
//! ```

use std::time::Duration;

use crate::{HardwareError, Result, traits::Clock};

/// Number of ticks between two overflows of the 16-bit counter.
pub const COUNTER_PERIOD: u64 = 1 << 16;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Calibrated countdown for a fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    window: Duration,
    tick_hz: u32,
    total_ticks: u64,
}

impl Countdown {
    /// Calibrate a countdown for `window` at a timer rate of `tick_hz`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the window or the tick rate is zero,
    /// or if the window is not a whole number of timer ticks.
    pub fn new(window: Duration, tick_hz: u32) -> Result<Self> {
        if window.is_zero() {
            return Err(HardwareError::configuration("countdown window is zero"));
        }
        if tick_hz == 0 {
            return Err(HardwareError::configuration("timer tick rate is zero"));
        }

        let scaled = window.as_nanos() * u128::from(tick_hz);
        if scaled % NANOS_PER_SEC != 0 {
            return Err(HardwareError::configuration(format!(
                "window of {window:?} is not a whole number of ticks at {tick_hz} Hz"
            )));
        }

        let total_ticks = u64::try_from(scaled / NANOS_PER_SEC).map_err(|_| {
            HardwareError::configuration(format!("window of {window:?} is too long"))
        })?;

        Ok(Self {
            window,
            tick_hz,
            total_ticks,
        })
    }

    /// The calibrated window.
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    /// Total timer ticks in the window.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Number of counter overflows until the window has elapsed.
    pub fn overflows(&self) -> u64 {
        self.total_ticks.div_ceil(COUNTER_PERIOD)
    }

    /// Ticks counted before the first overflow.
    ///
    /// Every later period is a full [`COUNTER_PERIOD`].
    pub fn first_period_ticks(&self) -> u64 {
        self.total_ticks - (self.overflows() - 1) * COUNTER_PERIOD
    }

    /// Value loaded into the counter before it starts.
    ///
    /// Later periods restart from zero.
    pub fn first_reload(&self) -> u16 {
        // first_period_ticks is in 1..=COUNTER_PERIOD, so the result fits.
        ((COUNTER_PERIOD - self.first_period_ticks()) % COUNTER_PERIOD) as u16
    }

    /// Tick count of every overflow period, in order.
    pub fn periods(&self) -> impl Iterator<Item = u64> + '_ {
        let first = self.first_period_ticks();
        std::iter::once(first)
            .chain(std::iter::repeat_n(COUNTER_PERIOD, (self.overflows() - 1) as usize))
    }

    /// Block until the last overflow has been observed.
    ///
    /// Each period is waited for separately. Period boundaries are rounded
    /// down to the nanosecond on the cumulative tick count, so the waits
    /// always add up to exactly [`window`](Self::window).
    pub async fn run<C: Clock>(&self, clock: &mut C) {
        let mut ticks = 0u64;
        let mut elapsed = Duration::ZERO;

        for period in self.periods() {
            ticks += period;
            let target = self.ticks_to_duration(ticks);
            clock.wait_for(target - elapsed).await;
            elapsed = target;
        }
    }

    fn ticks_to_duration(&self, ticks: u64) -> Duration {
        let nanos = u128::from(ticks) * NANOS_PER_SEC / u128::from(self.tick_hz);
        Duration::from_nanos(nanos as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::VirtualClock;
    use rstest::rstest;

    #[test]
    fn test_gate_window_at_crystal_rate() {
        let countdown = Countdown::new(Duration::from_secs(5), 921_600).unwrap();

        assert_eq!(countdown.total_ticks(), 4_608_000);
        assert_eq!(countdown.overflows(), 71);
        assert_eq!(countdown.first_period_ticks(), 20_480);
        assert_eq!(countdown.first_reload(), 0xB000);
    }

    #[test]
    fn test_single_overflow_window() {
        let countdown = Countdown::new(Duration::from_millis(50), 1_000_000).unwrap();

        assert_eq!(countdown.total_ticks(), 50_000);
        assert_eq!(countdown.overflows(), 1);
        assert_eq!(countdown.first_reload(), 0x3CB0);
    }

    #[test]
    fn test_exact_multiple_of_period_reloads_zero() {
        // 65536 ticks at 65536 Hz is one second, one full period.
        let countdown = Countdown::new(Duration::from_secs(1), 65_536).unwrap();

        assert_eq!(countdown.overflows(), 1);
        assert_eq!(countdown.first_reload(), 0);
        assert_eq!(countdown.first_period_ticks(), COUNTER_PERIOD);
    }

    #[test]
    fn test_periods_sum_to_total() {
        let countdown = Countdown::new(Duration::from_secs(5), 921_600).unwrap();
        let periods: Vec<u64> = countdown.periods().collect();

        assert_eq!(periods.len(), 71);
        assert_eq!(periods[0], 20_480);
        assert!(periods[1..].iter().all(|&p| p == COUNTER_PERIOD));
        assert_eq!(periods.iter().sum::<u64>(), countdown.total_ticks());
    }

    #[rstest]
    #[case(Duration::ZERO, 921_600)]
    #[case(Duration::from_secs(5), 0)]
    #[case(Duration::from_nanos(1), 921_600)]
    fn test_invalid_calibration(#[case] window: Duration, #[case] tick_hz: u32) {
        let result = Countdown::new(window, tick_hz);
        assert!(matches!(
            result,
            Err(HardwareError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_waits_exactly_the_window() {
        let countdown = Countdown::new(Duration::from_secs(5), 921_600).unwrap();
        let mut clock = VirtualClock::new();

        countdown.run(&mut clock).await;

        assert_eq!(clock.waits().len(), 71);
        assert_eq!(clock.elapsed(), Duration::from_secs(5));
    }
}
