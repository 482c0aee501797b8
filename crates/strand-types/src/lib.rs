//! Strand Types - records and configuration for the evolution core
//!
//! The shared vocabulary of the workspace:
//! - ULID-backed typed ids
//! - Persisted records (ideas, swipes, sessions, mutations, variations,
//!   syntheses) with their access traits
//! - The per-user personality aggregate with clamped bias maps
//! - The injected configuration struct
//! - The shared top-N score ranking

pub mod config;
pub mod id;
pub mod personality;
pub mod rank;
pub mod record;

pub use config::{BiasWeights, DecayPolicy, EvolutionConfig, EvolutionLimits, SwipeThresholds};
pub use id::{IdeaId, MutationId, SessionId, SwipeId, SynthesisId, UserId, VariationId};
pub use personality::{is_technical_term, ProductPersonality, SpeedAverages, TECHNICAL_TERMS};
pub use record::{
    FeatureVariation, Idea, IdeaSourceSummary, Mutation, MutationType, Scored, SessionRecord,
    SessionStatus, SourceRef, Swipe, SwipeDirection, SwipeSession, SwipeSpeed, Synthesis,
    MAX_DNA_KEYWORDS,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Strand records
    pub use crate::{
        EvolutionConfig, Idea, IdeaId, Mutation, MutationId, MutationType, ProductPersonality,
        Scored, SessionId, SessionRecord, SourceRef, Swipe, SwipeDirection, SwipeSession,
        SwipeSpeed, Synthesis, UserId,
    };
}
