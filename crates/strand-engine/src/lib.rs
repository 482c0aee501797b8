//! Strand Engine - preference learning and evolutionary selection
//!
//! The core of the idea-evolution pipeline:
//! - Classifies raw swipe interactions into speed buckets
//! - Folds swipe history into a persistent per-user personality profile
//!   with clamped biases and lazy decay
//! - Evolves top-ranked ideas through crossover and repurposing
//! - Synthesizes selected sources into one merged pitch
//!
//! All engines consume repository and generator capabilities as injected
//! strategy objects, and absorb transient generation failures into
//! deterministic fallbacks so callers see degraded results, never hard
//! errors.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod classify;
pub mod error;
pub mod mutation;
pub mod personality;
mod prompt;
pub mod synthesis;

pub use classify::classify_speed;
pub use error::EngineError;
pub use mutation::{MutationEngine, MutationSpec};
pub use personality::PersonalityAggregator;
pub use synthesis::SynthesisEngine;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the Strand engines
    pub use crate::{
        classify_speed, EngineError, MutationEngine, MutationSpec, PersonalityAggregator,
        SynthesisEngine,
    };
}
