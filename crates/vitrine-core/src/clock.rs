//! Tick source and time arithmetic for frame-driven animations
//!
//! Animations never read the wall clock themselves. The host owns a [`Clock`]
//! and passes `now` into every frame callback, which keeps the easing math
//! deterministic under test.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Real clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now: Duration) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Calculate animation progress (0.0 to 1.0)
///
/// A `now` earlier than `start` yields 0; a zero duration is always complete.
#[inline]
pub fn progress(start: Duration, now: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if an animation started at `start` has run its full duration
#[inline]
pub fn is_complete(start: Duration, now: Duration, duration: Duration) -> bool {
    now.saturating_sub(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear interpolation for u16 values (scroll positions)
#[inline]
pub fn lerp_u16(from: u16, to: u16, t: f64) -> u16 {
    lerp(from as f64, to as f64, t).round() as u16
}

/// Frame interval for a target frame rate, never shorter than 1 ms
#[inline]
pub fn frame_interval(fps: u32) -> Duration {
    if fps == 0 {
        Duration::from_millis(16) // ~60fps fallback
    } else {
        Duration::from_millis((1000 / fps as u64).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_u16() {
        assert_eq!(lerp_u16(0, 100, 0.0), 0);
        assert_eq!(lerp_u16(0, 100, 0.5), 50);
        assert_eq!(lerp_u16(0, 100, 1.0), 100);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(Duration::ZERO, Duration::ZERO, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_is_clamped() {
        let start = Duration::from_millis(500);
        let duration = Duration::from_millis(900);
        assert_eq!(progress(start, Duration::from_millis(100), duration), 0.0);
        assert!((progress(start, Duration::from_millis(950), duration) - 0.5).abs() < 1e-9);
        assert_eq!(progress(start, Duration::from_secs(10), duration), 1.0);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance_ms(16);
        clock.advance_ms(16);
        assert_eq!(clock.now(), Duration::from_millis(32));
        clock.set(Duration::from_secs(1));
        assert!(is_complete(Duration::ZERO, clock.now(), Duration::from_millis(900)));
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(60), Duration::from_millis(16));
        assert_eq!(frame_interval(0), Duration::from_millis(16));
        assert_eq!(frame_interval(30), Duration::from_millis(33));
        assert_eq!(frame_interval(1000), Duration::from_millis(1));
        assert_eq!(frame_interval(2000), Duration::from_millis(1));
        assert_eq!(frame_interval(u32::MAX), Duration::from_millis(1));
    }
}
