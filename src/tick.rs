//! Fixed-cadence scheduling: update counter and frame clock.

use std::time::Duration;

/// Counts update calls and fires a gravity tick on every `cadence`-th one,
/// starting with the very first call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickScheduler {
    counter: u64,
    cadence: u32,
}

impl TickScheduler {
    pub fn new(cadence: u32) -> Self {
        Self {
            counter: 0,
            cadence: cadence.max(1),
        }
    }

    /// Register one update call. Returns true if it is a gravity tick.
    pub fn advance(&mut self) -> bool {
        let fire = self.counter % u64::from(self.cadence) == 0;
        self.counter = self.counter.wrapping_add(1);
        fire
    }

    pub fn updates(&self) -> u64 {
        self.counter
    }

    pub fn cadence(&self) -> u32 {
        self.cadence
    }
}

/// Slowest and fastest update rates the clock accepts, in Hz.
pub const MIN_UPDATE_RATE: f64 = 1.0;
pub const MAX_UPDATE_RATE: f64 = 1000.0;

/// Turns wall-clock time into a whole number of fixed-length update steps.
/// Elapsed time per frame is clamped so a stall cannot flood the simulation,
/// and one call never yields more than `max_steps` steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: Duration,
    max_elapsed: Duration,
    max_steps: u32,
    pending: Duration,
}

impl FrameClock {
    /// Non-finite rates count as the fastest rate. `max_steps` of 0 is read as 1.
    pub fn new(update_rate: f64, max_elapsed: Duration, max_steps: u32) -> Self {
        let rate = if update_rate.is_finite() {
            update_rate.clamp(MIN_UPDATE_RATE, MAX_UPDATE_RATE)
        } else {
            MAX_UPDATE_RATE
        };
        Self {
            step: Duration::from_secs_f64(1.0 / rate),
            max_elapsed,
            max_steps: max_steps.max(1),
            pending: Duration::ZERO,
        }
    }

    /// Add `elapsed` (clamped) and return how many update steps are due.
    /// Time beyond `max_steps` steps is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending += elapsed.min(self.max_elapsed);
        let mut steps = 0;
        while self.pending >= self.step && steps < self.max_steps {
            self.pending -= self.step;
            steps += 1;
        }
        if steps == self.max_steps {
            self.pending = Duration::ZERO;
        }
        steps
    }

    #[cfg(test)]
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time left before the next step is due.
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tenth_update_is_gravity() {
        let mut ticks = TickScheduler::new(10);
        let mut fired = Vec::new();
        for update in 0..35u64 {
            if ticks.advance() {
                fired.push(update);
            }
        }
        assert_eq!(fired, vec![0, 10, 20, 30]);
        assert_eq!(ticks.updates(), 35);
    }

    #[test]
    fn test_zero_cadence_is_every_update() {
        let mut ticks = TickScheduler::new(0);
        assert_eq!(ticks.cadence(), 1);
        assert!((0..5).all(|_| ticks.advance()));
    }

    #[test]
    fn test_frame_clock_accumulates() {
        let mut clock = FrameClock::new(100.0, Duration::from_millis(100), 10);
        assert_eq!(clock.advance(Duration::from_millis(5)), 0);
        assert_eq!(clock.advance(Duration::from_millis(5)), 1);
        assert_eq!(clock.advance(Duration::from_millis(35)), 3);
        assert_eq!(clock.until_next(), Duration::from_millis(5));
    }

    #[test]
    fn test_frame_clock_clamps_stalls() {
        let mut clock = FrameClock::new(50.0, Duration::from_millis(100), 10);
        let steps = clock.advance(Duration::from_secs(30));
        assert_eq!(steps, 5);
        // Five updates can never contain two gravity ticks at cadence 10.
        assert!(steps < 10);
    }

    #[test]
    fn test_fast_rate_fires_one_gravity_tick_per_stall() {
        let mut clock = FrameClock::new(600.0, Duration::from_millis(100), 10);
        let mut ticks = TickScheduler::new(10);
        for _ in 0..3 {
            let steps = clock.advance(Duration::from_secs(5));
            assert_eq!(steps, 10);
            let gravity = (0..steps).filter(|_| ticks.advance()).count();
            assert_eq!(gravity, 1);
        }
        assert_eq!(clock.until_next(), clock.step());
    }

    #[test]
    fn test_unbounded_rate_still_has_a_step() {
        for rate in [f64::INFINITY, f64::NAN, 1e12, 0.0, -5.0] {
            let mut clock = FrameClock::new(rate, Duration::from_millis(100), 10);
            assert!(clock.step() >= Duration::from_micros(999));
            assert!(clock.step() <= Duration::from_secs(1));
            assert!(clock.advance(Duration::from_secs(1)) <= 10);
        }
    }
}
