//! Generation capability trait

use async_trait::async_trait;

/// Transient generation failure
///
/// Engines never surface these; they switch to deterministic fallback
/// generation and log a warning instead.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Backend could not be reached or refused the request
    #[error("generation backend unavailable: {0}")]
    Unavailable(String),

    /// Backend accepted the request but did not answer in time
    #[error("generation timed out: {0}")]
    Timeout(String),

    /// Backend answered with a payload that could not be read
    #[error("generation payload malformed: {0}")]
    Malformed(String),
}

/// Prompt-to-text generation capability
///
/// Implementations are strategy objects (`Arc<dyn ConceptGenerator>`)
/// injected into the engines at wiring time.
#[async_trait]
pub trait ConceptGenerator: Send + Sync {
    /// Generate text from a system prompt and a user prompt
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError>;
}

/// Generator returning one fixed reply
///
/// Offline wiring and smoke tests; scripted and failing doubles live in
/// `strand-test-utils`.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    reply: String,
}

impl StaticGenerator {
    /// Create a generator that always answers with `reply`
    #[must_use]
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ConceptGenerator for StaticGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, GenerationError> {
        Ok(self.reply.clone())
    }
}
