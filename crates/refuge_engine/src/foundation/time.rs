//! Time management utilities
//!
//! Two clocks drive the simulation: [`FrameTimer`] produces the elapsed
//! seconds handed to the scene tick, and [`DayClock`] turns elapsed seconds
//! into simulated days for the growth rule.

use std::time::Instant;

/// Source of the current simulated day
pub trait SimulatedClock {
    /// Whole simulated days elapsed since the simulation started
    fn current_day(&self) -> u32;
}

/// Frame timer producing elapsed simulation time
///
/// Runs either against the wall clock (`update`) or in fixed steps
/// (`advance`) for headless runs and tests.
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer from the wall clock (once per frame)
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by a fixed step, returning the new total elapsed time
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        self.delta_time = delta_time.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.total_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Simulated calendar derived from elapsed seconds
#[derive(Debug, Clone)]
pub struct DayClock {
    seconds_per_day: f32,
    elapsed: f32,
}

impl DayClock {
    /// Create a clock where one simulated day lasts `seconds_per_day`
    pub fn new(seconds_per_day: f32) -> Self {
        Self {
            seconds_per_day: seconds_per_day.max(f32::EPSILON),
            elapsed: 0.0,
        }
    }

    /// Set the elapsed simulation time in seconds
    pub fn set_elapsed(&mut self, elapsed: f32) {
        self.elapsed = elapsed.max(0.0);
    }

    /// Seconds of simulation time per simulated day
    pub fn seconds_per_day(&self) -> f32 {
        self.seconds_per_day
    }
}

impl SimulatedClock for DayClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn current_day(&self) -> u32 {
        (self.elapsed / self.seconds_per_day).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_step_advance() {
        let mut timer = FrameTimer::new();
        timer.advance(0.5);
        let total = timer.advance(0.25);

        assert_relative_eq!(total, 0.75);
        assert_relative_eq!(timer.delta_time(), 0.25);
        assert_eq!(timer.frame_count(), 2);
    }

    #[test]
    fn test_negative_step_is_clamped() {
        let mut timer = FrameTimer::new();
        timer.advance(1.0);
        timer.advance(-3.0);
        assert_relative_eq!(timer.total_time(), 1.0);
    }

    #[test]
    fn test_day_clock() {
        let mut clock = DayClock::new(10.0);
        assert_eq!(clock.current_day(), 0);

        clock.set_elapsed(9.9);
        assert_eq!(clock.current_day(), 0);

        clock.set_elapsed(25.0);
        assert_eq!(clock.current_day(), 2);
    }
}
