//! Per-user learned preference profile
//!
//! The personality aggregate holds the open-ended bias maps the idea
//! generator is steered by. All bias writes go through the `apply_*`
//! methods so the [-1, 1] clamp can never be bypassed.

use crate::id::UserId;
use crate::record::SwipeSpeed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keywords that also update the technical bias map (matched
/// case-insensitively against DNA keywords)
pub const TECHNICAL_TERMS: &[&str] = &[
    "serverless",
    "monolith",
    "microservices",
    "cloud",
    "api",
    "realtime",
    "offline",
    "mobile",
    "web",
    "desktop",
    "ai",
    "ml",
    "blockchain",
    "iot",
    "saas",
    "subscription",
];

/// Whether a DNA keyword is a technical term
#[inline]
#[must_use]
pub fn is_technical_term(keyword: &str) -> bool {
    TECHNICAL_TERMS
        .iter()
        .any(|term| term.eq_ignore_ascii_case(keyword))
}

/// Running swipe-duration averages per speed bucket, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedAverages {
    /// Fast-bucket average
    pub fast_ms: f64,
    /// Medium-bucket average
    pub medium_ms: f64,
    /// Slow-bucket average
    pub slow_ms: f64,
}

impl SpeedAverages {
    /// Fold one session's bucket mean into the running average
    ///
    /// A single smoothing step: `new = (old + mean) / 2`. Not a weighted
    /// mean across sample counts.
    pub fn fold(&mut self, speed: SwipeSpeed, session_mean_ms: f64) {
        let slot = match speed {
            SwipeSpeed::Fast => &mut self.fast_ms,
            SwipeSpeed::Medium => &mut self.medium_ms,
            SwipeSpeed::Slow => &mut self.slow_ms,
        };
        *slot = (*slot + session_mean_ms) / 2.0;
    }
}

/// Per-user aggregate of learned preferences
///
/// Created lazily on first aggregation, mutated by the personality
/// aggregator, deleted only by explicit reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPersonality {
    /// Owning user
    pub user_id: UserId,
    /// Keyword → affinity in [-1, 1], open-ended key set
    pub product_biases: HashMap<String, f64>,
    /// Technical keyword → affinity in [-1, 1]
    pub technical_biases: HashMap<String, f64>,
    /// Strong-dislike signals, insertion-ordered, duplicate-free, capped
    pub disliked_patterns: Vec<String>,
    /// Running swipe-duration averages
    pub speed_averages: SpeedAverages,
    /// Number of sessions folded in
    pub total_sessions: u64,
    /// Timestamp of the last update (basis for decay)
    pub last_updated_at: DateTime<Utc>,
}

impl ProductPersonality {
    /// Create an empty profile for a user
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            product_biases: HashMap::new(),
            technical_biases: HashMap::new(),
            disliked_patterns: Vec::new(),
            speed_averages: SpeedAverages::default(),
            total_sessions: 0,
            last_updated_at: Utc::now(),
        }
    }

    /// Add `delta` to a product bias, clamped to [-1, 1]
    pub fn apply_product_bias(&mut self, keyword: &str, delta: f64) {
        let entry = self.product_biases.entry(keyword.to_string()).or_insert(0.0);
        *entry = (*entry + delta).clamp(-1.0, 1.0);
    }

    /// Add `delta` to a technical bias, clamped to [-1, 1]
    pub fn apply_technical_bias(&mut self, keyword: &str, delta: f64) {
        let entry = self
            .technical_biases
            .entry(keyword.to_string())
            .or_insert(0.0);
        *entry = (*entry + delta).clamp(-1.0, 1.0);
    }

    /// Record a strong-dislike pattern
    ///
    /// No-op when the pattern is already present or the list is at `cap`.
    /// Returns whether the pattern was added.
    pub fn note_disliked(&mut self, pattern: &str, cap: usize) -> bool {
        if self.disliked_patterns.len() >= cap {
            return false;
        }
        if self.disliked_patterns.iter().any(|p| p == pattern) {
            return false;
        }
        self.disliked_patterns.push(pattern.to_string());
        true
    }

    /// Shrink every bias by `(1 - factor)^periods`
    ///
    /// Monotonically shrinking; zero periods is the identity.
    pub fn decay(&mut self, periods: u32, factor_per_period: f64) {
        if periods == 0 {
            return;
        }
        let multiplier = (1.0 - factor_per_period).powi(periods as i32);
        for value in self.product_biases.values_mut() {
            *value *= multiplier;
        }
        for value in self.technical_biases.values_mut() {
            *value *= multiplier;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProductPersonality {
        ProductPersonality::new(UserId::new("u1"))
    }

    #[test]
    fn technical_terms_match_case_insensitively() {
        assert!(is_technical_term("ai"));
        assert!(is_technical_term("Serverless"));
        assert!(is_technical_term("SAAS"));
        assert!(!is_technical_term("productivity"));
    }

    #[test]
    fn bias_updates_clamp() {
        let mut p = profile();
        for _ in 0..30 {
            p.apply_product_bias("ai", 0.15);
        }
        assert_eq!(p.product_biases["ai"], 1.0);

        p.apply_technical_bias("ai", -5.0);
        assert_eq!(p.technical_biases["ai"], -1.0);
    }

    #[test]
    fn disliked_patterns_stay_unique_and_ordered() {
        let mut p = profile();
        assert!(p.note_disliked("social-media", 50));
        assert!(!p.note_disliked("social-media", 50));
        assert!(p.note_disliked("subscription-based", 50));
        assert_eq!(p.disliked_patterns, vec!["social-media", "subscription-based"]);
    }

    #[test]
    fn disliked_patterns_respect_cap() {
        let mut p = profile();
        for i in 0..60 {
            p.note_disliked(&format!("pattern-{i}"), 50);
        }
        assert_eq!(p.disliked_patterns.len(), 50);
    }

    #[test]
    fn decay_shrinks_toward_zero() {
        let mut p = profile();
        p.apply_product_bias("ai", 0.8);
        p.apply_technical_bias("ai", -0.5);

        p.decay(1, 0.10);
        assert!((p.product_biases["ai"] - 0.72).abs() < 1e-9);
        assert!((p.technical_biases["ai"] + 0.45).abs() < 1e-9);

        p.decay(0, 0.10);
        assert!((p.product_biases["ai"] - 0.72).abs() < 1e-9);
    }

    #[test]
    fn speed_average_is_one_smoothing_step() {
        let mut averages = SpeedAverages::default();
        averages.fold(SwipeSpeed::Fast, 800.0);
        assert_eq!(averages.fast_ms, 400.0);
        averages.fold(SwipeSpeed::Fast, 600.0);
        assert_eq!(averages.fast_ms, 500.0);
        assert_eq!(averages.medium_ms, 0.0);
    }

    #[test]
    fn bias_maps_serialize_as_open_keyword_maps() {
        let mut p = profile();
        p.apply_product_bias("fitness-tracking", 0.1);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json["product_biases"]["fitness-tracking"].is_number());
    }
}
