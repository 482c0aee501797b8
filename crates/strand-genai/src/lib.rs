//! Strand GenAI - text-generation capability
//!
//! One capability trait, multiple implementations selected at wiring
//! time and passed by reference into each engine. Callers must tolerate
//! non-JSON replies and total failure; every [`GenerationError`] is a
//! transient signal the engines absorb into deterministic fallbacks.

pub mod generator;
pub mod http;

pub use generator::{ConceptGenerator, GenerationError, StaticGenerator};
pub use http::ChatCompletionsGenerator;
