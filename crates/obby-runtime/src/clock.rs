//! Game clock and wall-clock time sources

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Largest frame delta accepted in one tick, in seconds
pub const MAX_FRAME_DELTA: f64 = 0.25;

/// Tracks game time: the latest frame delta, a monotonic global elapsed clock
/// shared by every time-driven system, and a fixed-timestep accumulator.
pub struct GameClock {
    /// Total elapsed game time in seconds (monotonic)
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Fixed timestep interval (default: 1/60 second)
    pub fixed_timestep: f64,
    accumulator: f64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: 1.0 / 60.0,
            accumulator: 0.0,
        }
    }
}

impl GameClock {
    /// Create a new game clock with default 60Hz fixed timestep
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by a host-supplied frame delta.
    ///
    /// Negative deltas are ignored so `total_time` never runs backwards.
    pub fn advance(&mut self, dt: f64) {
        // Clamp to avoid spiral of death
        self.delta_time = dt.clamp(0.0, MAX_FRAME_DELTA);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
    }

    /// Returns true if there's enough accumulated time for a fixed update step
    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.fixed_timestep
    }

    /// Consume one fixed timestep from the accumulator
    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.fixed_timestep;
    }
}

/// Wall-clock milliseconds.
///
/// Run timing reads wall time rather than counting ticks so it stays correct
/// under a variable frame rate.
pub trait TimeSource {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since the Unix epoch from the system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A hand-driven clock. Clones share the same underlying time, so a test can
/// keep one handle and advance the clock seen by the system under test.
#[derive(Debug, Default, Clone)]
pub struct ManualTimeSource {
    now: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::Relaxed);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance_ms((secs * 1000.0).round() as u64);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert!((clock.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_advance_accumulates_total_time() {
        let mut clock = GameClock::new();
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.total_time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut clock = GameClock::new();
        clock.advance(3.0);
        assert_eq!(clock.delta_time, MAX_FRAME_DELTA);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_accumulator_logic() {
        let mut clock = GameClock::new();
        clock.advance(1.0 / 30.0); // Two fixed steps worth

        assert!(clock.should_fixed_update());
        clock.consume_fixed_step();
        assert!(clock.should_fixed_update());
        clock.consume_fixed_step();
        assert!(!clock.should_fixed_update());
    }

    #[test]
    fn test_manual_time_shared_between_clones() {
        let time = ManualTimeSource::new(1_000);
        let handle = time.clone();
        handle.advance_secs(2.5);
        assert_eq!(time.now_ms(), 3_500);
        handle.set(10);
        assert_eq!(time.now_ms(), 10);
    }

    #[test]
    fn test_system_time_is_after_epoch() {
        assert!(SystemTimeSource.now_ms() > 0);
    }
}
