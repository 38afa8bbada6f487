//! Clock sources for the frame loop.
//!
//! The loop samples its clock exactly once per frame and feeds the delta to
//! the session state machine.

use std::time::{Duration, Instant};

/// Supplies the monotonic time elapsed since the previous sample.
pub trait ClockSource {
    /// Time since the previous call; zero on the first call.
    fn sample(&mut self) -> Duration;
}

/// Wall-clock source backed by [`Instant`].
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Option<Instant>,
}

impl MonotonicClock {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }
}

impl ClockSource for MonotonicClock {
    fn sample(&mut self) -> Duration {
        let now = Instant::now();
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        delta
    }
}

/// Clock that advances by a fixed step every sample.
///
/// Drives headless simulations and tests deterministically.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    step: Duration,
}

impl FixedStepClock {
    #[must_use]
    pub const fn new(step: Duration) -> Self {
        Self { step }
    }

    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }
}

impl ClockSource for FixedStepClock {
    fn sample(&mut self) -> Duration {
        self.step
    }
}

impl<T: ClockSource + ?Sized> ClockSource for Box<T> {
    fn sample(&mut self) -> Duration {
        (**self).sample()
    }
}
