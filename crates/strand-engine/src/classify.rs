//! Swipe speed classification
//!
//! Pure function: one duration, one bucket. Inclusive boundaries fall
//! into Medium. The caller guarantees a positive duration; the
//! classifier does not validate.

use strand_types::config::SwipeThresholds;
use strand_types::record::SwipeSpeed;

/// Classify a swipe duration into a speed bucket
#[inline]
#[must_use]
pub fn classify_speed(duration_ms: u64, thresholds: &SwipeThresholds) -> SwipeSpeed {
    if duration_ms < thresholds.fast_below_ms {
        SwipeSpeed::Fast
    } else if duration_ms > thresholds.slow_above_ms {
        SwipeSpeed::Slow
    } else {
        SwipeSpeed::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_boundaries() {
        let thresholds = SwipeThresholds::default();
        assert_eq!(classify_speed(999, &thresholds), SwipeSpeed::Fast);
        assert_eq!(classify_speed(1000, &thresholds), SwipeSpeed::Medium);
        assert_eq!(classify_speed(3000, &thresholds), SwipeSpeed::Medium);
        assert_eq!(classify_speed(3001, &thresholds), SwipeSpeed::Slow);
    }

    #[test]
    fn custom_thresholds() {
        let thresholds = SwipeThresholds {
            fast_below_ms: 500,
            slow_above_ms: 5000,
        };
        assert_eq!(classify_speed(499, &thresholds), SwipeSpeed::Fast);
        assert_eq!(classify_speed(500, &thresholds), SwipeSpeed::Medium);
        assert_eq!(classify_speed(5001, &thresholds), SwipeSpeed::Slow);
    }
}
