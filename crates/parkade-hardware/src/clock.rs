//! Wall-clock time source backed by the Tokio timer.

use std::time::Duration;

use crate::traits::Clock;

/// [`Clock`] that sleeps on the Tokio runtime timer.
///
/// Cheap to copy; every copy shares the runtime's timer wheel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for TokioClock {
    async fn wait_for(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
