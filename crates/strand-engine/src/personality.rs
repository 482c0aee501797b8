//! Personality aggregation
//!
//! Folds a completed session's swipes into the user's persistent
//! preference profile, and applies lazy decay when a profile is read.
//!
//! The profile is read-modify-write per request with no optimistic
//! concurrency check; concurrent sessions for the same user are
//! last-write-wins.

use crate::classify::classify_speed;
use crate::error::EngineError;
use chrono::Utc;
use std::sync::Arc;
use strand_store::{PersonalityStore, Repository, SessionStore};
use strand_types::config::EvolutionConfig;
use strand_types::personality::{is_technical_term, ProductPersonality};
use strand_types::record::{Idea, Swipe, SwipeDirection, SwipeSpeed};
use strand_types::{SessionId, UserId};

/// Folds swipe history into per-user preference profiles
pub struct PersonalityAggregator {
    sessions: Arc<dyn SessionStore>,
    swipes: Arc<dyn Repository<Swipe>>,
    ideas: Arc<dyn Repository<Idea>>,
    profiles: Arc<dyn PersonalityStore>,
    config: EvolutionConfig,
}

impl PersonalityAggregator {
    /// Create a new aggregator over the given collaborators
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        swipes: Arc<dyn Repository<Swipe>>,
        ideas: Arc<dyn Repository<Idea>>,
        profiles: Arc<dyn PersonalityStore>,
        config: EvolutionConfig,
    ) -> Self {
        Self {
            sessions,
            swipes,
            ideas,
            profiles,
            config,
        }
    }

    /// Fold one session's swipe history into the user's profile
    ///
    /// Missing ideas referenced by swipes are silently skipped. A session
    /// with zero swipes is a no-op: the profile is returned unchanged and
    /// no counters move.
    ///
    /// # Errors
    /// `NotFound` if the session does not exist or belongs to another
    /// user.
    pub async fn absorb_session(
        &self,
        user: &UserId,
        session_id: SessionId,
    ) -> Result<ProductPersonality, EngineError> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(|| EngineError::not_found("session", session_id))?;
        // Another user's session is invisible to this caller.
        if session.user_id != *user {
            return Err(EngineError::not_found("session", session_id));
        }

        let swipes = self.swipes.get_by_session(session_id).await?;
        let mut profile = self
            .profiles
            .get(user)
            .await?
            .unwrap_or_else(|| ProductPersonality::new(user.clone()));

        if swipes.is_empty() {
            tracing::debug!(%session_id, "session has no swipes, profile unchanged");
            return Ok(profile);
        }

        let mut buckets = SpeedBuckets::default();
        for swipe in &swipes {
            let speed = classify_speed(swipe.duration_ms, &self.config.swipe);
            buckets.add(speed, swipe.duration_ms);
            self.fold_swipe(&mut profile, swipe, speed).await?;
        }
        buckets.fold_into(&mut profile);

        profile.total_sessions += 1;
        profile.last_updated_at = Utc::now();
        let stored = self.profiles.upsert(profile).await?;

        tracing::info!(
            %session_id,
            user = %user,
            swipes = swipes.len(),
            sessions_total = stored.total_sessions,
            "absorbed session into personality profile"
        );
        Ok(stored)
    }

    /// Read a user's profile, applying lazy decay first
    ///
    /// Elapsed whole decay periods since the last update shrink every bias
    /// by `(1 - factor)^periods`; the decayed profile is persisted with a
    /// refreshed timestamp before it is returned. Reading twice within one
    /// period yields identical bias values.
    pub async fn profile(
        &self,
        user: &UserId,
    ) -> Result<Option<ProductPersonality>, EngineError> {
        let Some(mut profile) = self.profiles.get(user).await? else {
            return Ok(None);
        };

        let elapsed_days = (Utc::now() - profile.last_updated_at).num_days();
        // A non-positive period disables decay rather than dividing by it.
        let period_days = self.config.decay.period_days;
        let periods = if period_days > 0 && elapsed_days >= period_days {
            (elapsed_days / period_days) as u32
        } else {
            0
        };

        if periods >= 1 {
            profile.decay(periods, self.config.decay.factor_per_period);
            profile.last_updated_at = Utc::now();
            profile = self.profiles.upsert(profile).await?;
            tracing::debug!(user = %user, periods, "applied lazy bias decay");
        }
        Ok(Some(profile))
    }

    /// Explicitly reset a user's profile
    pub async fn reset(&self, user: &UserId) -> Result<(), EngineError> {
        self.profiles.delete(user).await?;
        tracing::info!(user = %user, "personality profile reset");
        Ok(())
    }

    async fn fold_swipe(
        &self,
        profile: &mut ProductPersonality,
        swipe: &Swipe,
        speed: SwipeSpeed,
    ) -> Result<(), EngineError> {
        let Some(idea) = self.ideas.get(swipe.idea_id).await? else {
            tracing::debug!(idea = %swipe.idea_id, "swiped idea no longer exists, skipping");
            return Ok(());
        };

        let delta = match swipe.direction {
            SwipeDirection::Right => self.config.bias.like_delta,
            SwipeDirection::Left => -self.config.bias.dislike_delta,
            // Up is an extra-strength like signal.
            SwipeDirection::Up => self.config.bias.super_like_delta,
        };
        let product_delta = delta * self.config.bias.speed_multiplier(speed);

        for keyword in &idea.dna {
            profile.apply_product_bias(keyword, product_delta);
            if is_technical_term(keyword) {
                // Technical biases take the raw delta, no speed multiplier.
                profile.apply_technical_bias(keyword, delta);
            }
        }

        // Left + Fast is the strong-dislike signal.
        if swipe.direction == SwipeDirection::Left && speed == SwipeSpeed::Fast {
            if let Some(first) = idea.first_keyword() {
                profile.note_disliked(first, self.config.limits.max_disliked_patterns);
            }
        }
        Ok(())
    }
}

/// Per-bucket duration sums for the running-average update
#[derive(Debug, Default)]
struct SpeedBuckets {
    fast: (f64, u32),
    medium: (f64, u32),
    slow: (f64, u32),
}

impl SpeedBuckets {
    fn add(&mut self, speed: SwipeSpeed, duration_ms: u64) {
        let slot = match speed {
            SwipeSpeed::Fast => &mut self.fast,
            SwipeSpeed::Medium => &mut self.medium,
            SwipeSpeed::Slow => &mut self.slow,
        };
        slot.0 += duration_ms as f64;
        slot.1 += 1;
    }

    /// Buckets with at least one sample fold their session mean in
    fn fold_into(self, profile: &mut ProductPersonality) {
        for (speed, (sum, count)) in [
            (SwipeSpeed::Fast, self.fast),
            (SwipeSpeed::Medium, self.medium),
            (SwipeSpeed::Slow, self.slow),
        ] {
            if count > 0 {
                profile.speed_averages.fold(speed, sum / f64::from(count));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_types::UserId;

    #[test]
    fn buckets_track_means_per_speed() {
        let mut buckets = SpeedBuckets::default();
        buckets.add(SwipeSpeed::Fast, 400);
        buckets.add(SwipeSpeed::Fast, 800);
        buckets.add(SwipeSpeed::Slow, 4000);

        let mut profile = ProductPersonality::new(UserId::new("u"));
        buckets.fold_into(&mut profile);
        // (0 + 600) / 2 and (0 + 4000) / 2
        assert_eq!(profile.speed_averages.fast_ms, 300.0);
        assert_eq!(profile.speed_averages.slow_ms, 2000.0);
        assert_eq!(profile.speed_averages.medium_ms, 0.0);
    }
}
