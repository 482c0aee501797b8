//! Injected evolution configuration
//!
//! Thresholds, weights, and limits are configuration rather than compiled
//! constants so boundary values can be exercised in tests without
//! recompilation. Defaults reproduce production behavior.

use crate::record::SwipeSpeed;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the evolution core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Swipe-speed classification thresholds
    pub swipe: SwipeThresholds,
    /// Bias deltas and speed multipliers
    pub bias: BiasWeights,
    /// Lazy decay policy
    pub decay: DecayPolicy,
    /// Structural limits
    pub limits: EvolutionLimits,
}

impl EvolutionConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With swipe thresholds
    #[inline]
    #[must_use]
    pub fn with_swipe(mut self, swipe: SwipeThresholds) -> Self {
        self.swipe = swipe;
        self
    }

    /// With bias weights
    #[inline]
    #[must_use]
    pub fn with_bias(mut self, bias: BiasWeights) -> Self {
        self.bias = bias;
        self
    }

    /// With decay policy
    #[inline]
    #[must_use]
    pub fn with_decay(mut self, decay: DecayPolicy) -> Self {
        self.decay = decay;
        self
    }

    /// With structural limits
    #[inline]
    #[must_use]
    pub fn with_limits(mut self, limits: EvolutionLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            swipe: SwipeThresholds::default(),
            bias: BiasWeights::default(),
            decay: DecayPolicy::default(),
            limits: EvolutionLimits::default(),
        }
    }
}

/// Duration thresholds for speed classification
///
/// Inclusive boundaries fall into Medium.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwipeThresholds {
    /// Durations strictly below this are Fast
    pub fast_below_ms: u64,
    /// Durations strictly above this are Slow
    pub slow_above_ms: u64,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            fast_below_ms: 1000,
            slow_above_ms: 3000,
        }
    }
}

/// Bias deltas and per-speed multipliers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BiasWeights {
    /// Added per Right swipe
    pub like_delta: f64,
    /// Subtracted per Left swipe (stored as a positive magnitude)
    pub dislike_delta: f64,
    /// Added per Up swipe (extra-strength like)
    pub super_like_delta: f64,
    /// Product-bias multiplier for Fast swipes
    pub fast_multiplier: f64,
    /// Product-bias multiplier for Medium swipes
    pub medium_multiplier: f64,
    /// Product-bias multiplier for Slow swipes
    pub slow_multiplier: f64,
}

impl BiasWeights {
    /// Product-bias multiplier for a speed bucket
    #[inline]
    #[must_use]
    pub fn speed_multiplier(&self, speed: SwipeSpeed) -> f64 {
        match speed {
            SwipeSpeed::Fast => self.fast_multiplier,
            SwipeSpeed::Medium => self.medium_multiplier,
            SwipeSpeed::Slow => self.slow_multiplier,
        }
    }
}

impl Default for BiasWeights {
    fn default() -> Self {
        Self {
            like_delta: 0.10,
            dislike_delta: 0.10,
            super_like_delta: 0.20,
            fast_multiplier: 1.5,
            medium_multiplier: 1.0,
            slow_multiplier: 0.5,
        }
    }
}

/// Lazy bias-decay policy, applied on profile read
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecayPolicy {
    /// Length of one decay period in days
    pub period_days: i64,
    /// Fraction removed per elapsed whole period
    pub factor_per_period: f64,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            period_days: 30,
            factor_per_period: 0.10,
        }
    }
}

/// Structural limits on the evolution pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvolutionLimits {
    /// Disliked-pattern list cap per profile
    pub max_disliked_patterns: usize,
    /// Maximum sources accepted in one synthesis selection
    pub max_selected_sources: usize,
    /// Parents taken from the score ranking when none are given explicitly
    pub default_top_parents: usize,
}

impl Default for EvolutionLimits {
    fn default() -> Self {
        Self {
            max_disliked_patterns: 50,
            max_selected_sources: 10,
            default_top_parents: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_constants() {
        let config = EvolutionConfig::new();
        assert_eq!(config.swipe.fast_below_ms, 1000);
        assert_eq!(config.swipe.slow_above_ms, 3000);
        assert_eq!(config.bias.like_delta, 0.10);
        assert_eq!(config.bias.super_like_delta, 0.20);
        assert_eq!(config.decay.period_days, 30);
        assert_eq!(config.limits.max_disliked_patterns, 50);
        assert_eq!(config.limits.max_selected_sources, 10);
    }

    #[test]
    fn speed_multiplier_lookup() {
        let bias = BiasWeights::default();
        assert_eq!(bias.speed_multiplier(SwipeSpeed::Fast), 1.5);
        assert_eq!(bias.speed_multiplier(SwipeSpeed::Medium), 1.0);
        assert_eq!(bias.speed_multiplier(SwipeSpeed::Slow), 0.5);
    }

    #[test]
    fn config_builder() {
        let config = EvolutionConfig::new().with_swipe(SwipeThresholds {
            fast_below_ms: 500,
            slow_above_ms: 5000,
        });
        assert_eq!(config.swipe.fast_below_ms, 500);
        assert_eq!(config.limits.default_top_parents, 3);
    }
}
