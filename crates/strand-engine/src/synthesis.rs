//! Synthesis engine
//!
//! Merges 2–10 selected sources (feature variations or mutations) into
//! one cohesive pitch. A single selection bypasses synthesis entirely;
//! generation failures degrade to a deterministic "individual paths"
//! presentation that still references every source.

use crate::error::EngineError;
use crate::prompt::{self, SynthesisReply, SYNTHESIS_SYSTEM_PROMPT};
use std::collections::HashMap;
use std::sync::Arc;
use strand_genai::{ConceptGenerator, GenerationError};
use strand_store::{Repository, ScoredRepository, SessionStore};
use strand_types::config::EvolutionConfig;
use strand_types::record::{
    FeatureVariation, IdeaSourceSummary, Mutation, SourceRef, Synthesis,
};
use strand_types::SessionId;

const FALLBACK_BRIDGE: &str = "These concepts were kept as individual paths rather than being \
forced into a single merge.";

const FALLBACK_GUIDANCE: &str = "Pick fewer concepts next time for a tighter merged direction.";

/// Merges selected sources into one pitch
pub struct SynthesisEngine {
    sessions: Arc<dyn SessionStore>,
    variations: Arc<dyn ScoredRepository<FeatureVariation>>,
    mutations: Arc<dyn ScoredRepository<Mutation>>,
    syntheses: Arc<dyn Repository<Synthesis>>,
    generator: Arc<dyn ConceptGenerator>,
    config: EvolutionConfig,
}

impl SynthesisEngine {
    /// Create a new synthesis engine over the given collaborators
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        variations: Arc<dyn ScoredRepository<FeatureVariation>>,
        mutations: Arc<dyn ScoredRepository<Mutation>>,
        syntheses: Arc<dyn Repository<Synthesis>>,
        generator: Arc<dyn ConceptGenerator>,
        config: EvolutionConfig,
    ) -> Self {
        Self {
            sessions,
            variations,
            mutations,
            syntheses,
            generator,
            config,
        }
    }

    /// Record a selection and synthesize when it has two or more sources
    ///
    /// Exactly one selection is recorded and returns `Ok(None)`; no
    /// `Synthesis` record is ever created for it. Every rejection,
    /// including one where fewer than two sources resolve, happens before
    /// the selection is written to the session.
    ///
    /// # Errors
    /// `NotFound` for unknown sessions; `InvalidState` for completed
    /// sessions, selections of 0 or more than the configured maximum, and
    /// selections where fewer than two sources resolve.
    pub async fn submit_selection(
        &self,
        session_id: SessionId,
        selected: Vec<SourceRef>,
    ) -> Result<Option<Synthesis>, EngineError> {
        let mut session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(|| EngineError::not_found("session", session_id))?;
        if !session.is_active() {
            return Err(EngineError::InvalidState(
                "cannot submit a selection to a completed session".to_string(),
            ));
        }

        let max = self.config.limits.max_selected_sources;
        if selected.is_empty() || selected.len() > max {
            return Err(EngineError::InvalidState(format!(
                "selection must contain between 1 and {max} sources, got {}",
                selected.len()
            )));
        }

        if selected.len() == 1 {
            session.selected_sources = selected;
            self.sessions.update(session).await?;
            tracing::debug!(%session_id, "single selection, synthesis bypassed");
            return Ok(None);
        }

        let (refs, sources) = self.resolve_sources(&selected).await?;
        require_two_resolved(sources.len())?;

        session.selected_sources = selected;
        self.sessions.update(session).await?;

        let synthesis = self.synthesize(session_id, refs, sources).await?;
        Ok(Some(synthesis))
    }

    /// Regenerate the session's synthesis from its stored selection
    ///
    /// Any prior synthesis for the session is deleted once the stored
    /// selection has been validated.
    ///
    /// # Errors
    /// `NotFound` for unknown sessions; `InvalidState` when fewer than
    /// two selections are stored or fewer than two still resolve.
    pub async fn resynthesize(&self, session_id: SessionId) -> Result<Synthesis, EngineError> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(|| EngineError::not_found("session", session_id))?;

        if session.selected_sources.len() < 2 {
            return Err(EngineError::InvalidState(
                "re-synthesis requires at least two stored selections".to_string(),
            ));
        }

        let (refs, sources) = self.resolve_sources(&session.selected_sources).await?;
        require_two_resolved(sources.len())?;

        let prior = self.syntheses.get_by_session(session_id).await?;
        for record in prior {
            self.syntheses.delete(record.id).await?;
        }

        self.synthesize(session_id, refs, sources).await
    }

    async fn synthesize(
        &self,
        session_id: SessionId,
        refs: Vec<SourceRef>,
        sources: Vec<IdeaSourceSummary>,
    ) -> Result<Synthesis, EngineError> {
        let synthesis = match self.request_merge(&sources).await {
            Ok(reply) => {
                let title = reply.merged_title.trim();
                let description = reply.merged_description.trim();
                if title.is_empty() || description.is_empty() {
                    tracing::warn!(
                        %session_id,
                        "generator returned an empty merge, using individual paths"
                    );
                    individual_paths(session_id, &refs, &sources)
                } else {
                    Synthesis::new(
                        session_id,
                        title,
                        description,
                        reply.thematic_bridge,
                        reply.retained_elements,
                        refs,
                    )
                }
            }
            Err(err) => {
                tracing::warn!(
                    %session_id,
                    error = %err,
                    "merge generation failed, using individual paths"
                );
                individual_paths(session_id, &refs, &sources)
            }
        };

        tracing::info!(
            %session_id,
            sources = synthesis.source_refs.len(),
            "synthesis created"
        );
        Ok(self.syntheses.create(synthesis).await?)
    }

    /// Resolve refs to generic source summaries, dropping unresolved ones
    async fn resolve_sources(
        &self,
        selected: &[SourceRef],
    ) -> Result<(Vec<SourceRef>, Vec<IdeaSourceSummary>), EngineError> {
        let mut refs = Vec::with_capacity(selected.len());
        let mut sources = Vec::with_capacity(selected.len());
        for source_ref in selected {
            let summary = match source_ref {
                SourceRef::Variation(id) => self
                    .variations
                    .get(*id)
                    .await?
                    .as_ref()
                    .map(IdeaSourceSummary::from),
                SourceRef::Mutation(id) => self
                    .mutations
                    .get(*id)
                    .await?
                    .as_ref()
                    .map(IdeaSourceSummary::from),
            };
            match summary {
                Some(summary) => {
                    refs.push(*source_ref);
                    sources.push(summary);
                }
                None => {
                    tracing::debug!(source = %source_ref, "selected source no longer exists");
                }
            }
        }
        Ok((refs, sources))
    }

    async fn request_merge(
        &self,
        sources: &[IdeaSourceSummary],
    ) -> Result<SynthesisReply, GenerationError> {
        let user_prompt = prompt::synthesis_user_prompt(sources);
        let text = self
            .generator
            .generate(SYNTHESIS_SYSTEM_PROMPT, &user_prompt)
            .await?;
        serde_json::from_str(prompt::strip_code_fences(&text))
            .map_err(|e| GenerationError::Malformed(e.to_string()))
    }
}

fn require_two_resolved(resolved: usize) -> Result<(), EngineError> {
    if resolved < 2 {
        return Err(EngineError::InvalidState(format!(
            "synthesis needs at least 2 resolvable sources, {resolved} resolved"
        )));
    }
    Ok(())
}

/// Deterministic fallback: present every source as its own path
fn individual_paths(
    session_id: SessionId,
    refs: &[SourceRef],
    sources: &[IdeaSourceSummary],
) -> Synthesis {
    let title = format!(
        "{} (+{} alternatives)",
        sources[0].title,
        sources.len() - 1
    );

    let mut description = format!(
        "Primary Path: {}. {}",
        sources[0].title, sources[0].description
    );
    for (index, source) in sources.iter().enumerate().skip(1) {
        description.push_str(&format!(
            "\n\nAlternative {}: {}. {}",
            index, source.title, source.description
        ));
    }
    description.push_str("\n\n");
    description.push_str(FALLBACK_GUIDANCE);

    let retained: HashMap<String, Vec<String>> = sources
        .iter()
        .map(|source| (source.id.clone(), source.key_features.clone()))
        .collect();

    Synthesis::new(
        session_id,
        title,
        description,
        FALLBACK_BRIDGE,
        retained,
        refs.to_vec(),
    )
}
