//! Virtual clock for deterministic tests.

use std::time::Duration;

use super::Journal;
use crate::traits::Clock;

/// [`Clock`] that returns immediately and records every requested wait.
///
/// Virtual time is the sum of all waits so far. Clones share the same
/// timeline, so a test can hand one clone to the controller and read the
/// timeline from another.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use parkade_hardware::mock::VirtualClock;
/// use parkade_hardware::traits::Clock;
///
/// # async fn example() {
/// let clock = VirtualClock::new();
/// let mut controller_clock = clock.clone();
///
/// controller_clock.wait_for(Duration::from_millis(20)).await;
/// assert_eq!(clock.elapsed(), Duration::from_millis(20));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    waits: Journal<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, oldest first.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.snapshot()
    }

    /// Virtual time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.waits.with(|waits| waits.iter().sum())
    }
}

impl Clock for VirtualClock {
    async fn wait_for(&mut self, duration: Duration) {
        self.waits.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_virtual_clock_accumulates() {
        let observer = VirtualClock::new();
        let mut clock = observer.clone();

        clock.wait_for(Duration::from_millis(20)).await;
        clock.wait_for(Duration::from_millis(1000)).await;

        assert_eq!(
            observer.waits(),
            vec![Duration::from_millis(20), Duration::from_millis(1000)]
        );
        assert_eq!(observer.elapsed(), Duration::from_millis(1020));
    }
}
