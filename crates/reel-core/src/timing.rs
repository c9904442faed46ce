//! Spin timing and reel easing

use std::f64::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Duration factor applied in turbo mode
pub const TURBO_FACTOR: f64 = 0.5;

/// Upper bound for each timing value (seconds)
pub const MAX_TIMING_SECS: f64 = 60.0;

/// Staggered reel durations for one spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTiming {
    /// Spin duration of the leftmost reel (seconds)
    pub base_duration_secs: f64,

    /// Extra duration added per reel to the right (seconds)
    pub duration_increment_secs: f64,
}

impl SpinTiming {
    /// Classic cabinet timing
    pub fn classic() -> Self {
        Self {
            base_duration_secs: 0.1,
            duration_increment_secs: 0.6,
        }
    }

    /// Fast mode
    pub fn turbo() -> Self {
        Self::classic().scaled(TURBO_FACTOR)
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            base_duration_secs: self.base_duration_secs * factor,
            duration_increment_secs: self.duration_increment_secs * factor,
        }
    }

    pub fn base_duration(&self) -> Duration {
        Duration::from_secs_f64(self.base_duration_secs)
    }

    pub fn duration_increment(&self) -> Duration {
        Duration::from_secs_f64(self.duration_increment_secs)
    }

    /// Spin duration for reel `index`
    pub fn reel_duration(&self, index: usize) -> Duration {
        self.base_duration() + self.duration_increment() * index as u32
    }

    /// Time until the last of `reel_count` reels stops
    pub fn total_spin_duration(&self, reel_count: usize) -> Duration {
        self.reel_duration(reel_count.saturating_sub(1))
    }

    pub fn validate(&self) -> SlotResult<()> {
        for (name, value) in [
            ("base_duration_secs", self.base_duration_secs),
            ("duration_increment_secs", self.duration_increment_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SlotError::Config(format!(
                    "timing.{name} must be a non-negative number, got {value}"
                )));
            }
            if value > MAX_TIMING_SECS {
                return Err(SlotError::Config(format!(
                    "timing.{name} must be at most {MAX_TIMING_SECS}s, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::classic()
    }
}

/// Normalized spin progress in `[0, 1]`
///
/// A zero-length spin is complete immediately.
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Cosine ease-in-out: 0 at t=0, 1 at t=1, zero slope at both ends
pub fn ease_in_out_cosine(t: f64) -> f64 {
    0.5 * (1.0 - (t * PI).cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reel_durations_are_staggered() {
        let timing = SpinTiming::classic();
        assert_relative_eq!(timing.reel_duration(0).as_secs_f64(), 0.1, epsilon = 1e-6);
        assert_relative_eq!(timing.reel_duration(1).as_secs_f64(), 0.7, epsilon = 1e-6);
        assert_relative_eq!(timing.reel_duration(4).as_secs_f64(), 2.5, epsilon = 1e-6);
        assert_eq!(timing.total_spin_duration(5), timing.reel_duration(4));
    }

    #[test]
    fn test_turbo_is_faster() {
        let classic = SpinTiming::classic();
        let turbo = SpinTiming::turbo();
        assert!(turbo.total_spin_duration(5) < classic.total_spin_duration(5));
    }

    #[test]
    fn test_validate_bounds() {
        assert!(SpinTiming::classic().validate().is_ok());

        let huge = SpinTiming {
            base_duration_secs: 1.0e30,
            ..SpinTiming::classic()
        };
        assert!(matches!(huge.validate(), Err(SlotError::Config(_))));

        let long_increment = SpinTiming {
            duration_increment_secs: MAX_TIMING_SECS + 1.0,
            ..SpinTiming::classic()
        };
        assert!(long_increment.validate().is_err());

        let negative = SpinTiming {
            base_duration_secs: -0.1,
            ..SpinTiming::classic()
        };
        assert!(negative.validate().is_err());

        let at_limit = SpinTiming {
            base_duration_secs: MAX_TIMING_SECS,
            duration_increment_secs: MAX_TIMING_SECS,
        };
        assert!(at_limit.validate().is_ok());
        assert_relative_eq!(
            at_limit.total_spin_duration(5).as_secs_f64(),
            5.0 * MAX_TIMING_SECS,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out_cosine(0.0), 0.0);
        assert_eq!(ease_in_out_cosine(1.0), 1.0);
        assert_relative_eq!(ease_in_out_cosine(0.5), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_easing_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let eased = ease_in_out_cosine(i as f64 / 100.0);
            assert!(eased >= prev);
            prev = eased;
        }
    }

    #[test]
    fn test_progress_clamps() {
        let d = Duration::from_secs(2);
        assert_eq!(progress(Duration::ZERO, d), 0.0);
        assert_relative_eq!(progress(Duration::from_secs(1), d), 0.5);
        assert_eq!(progress(Duration::from_secs(5), d), 1.0);
        assert_eq!(progress(Duration::ZERO, Duration::ZERO), 1.0);
    }

    #[test]
    fn test_validate_rejects_negative() {
        let timing = SpinTiming {
            base_duration_secs: -0.1,
            duration_increment_secs: 0.6,
        };
        assert!(timing.validate().is_err());
        assert!(SpinTiming::classic().validate().is_ok());
    }
}
