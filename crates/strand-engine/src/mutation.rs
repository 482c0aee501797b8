//! Mutation engine
//!
//! Evolves top-ranked parent ideas into new variants through two
//! strategies: crossover (two parents) and repurposing (one parent).
//! The AI generator drives the content; any generation failure degrades
//! to deterministic templated variants so a batch request never fails
//! outright.

use crate::error::EngineError;
use crate::prompt::{
    self, MutationReply, CROSSOVER_SYSTEM_PROMPT, REPURPOSING_SYSTEM_PROMPT,
};
use std::sync::Arc;
use strand_genai::{ConceptGenerator, GenerationError};
use strand_store::ScoredRepository;
use strand_types::config::EvolutionConfig;
use strand_types::record::{Idea, Mutation, MutationType};
use strand_types::{IdeaId, MutationId, SessionId};

/// Domains used by the deterministic repurposing fallback
const FALLBACK_DOMAINS: &[&str] = &[
    "healthcare",
    "education",
    "personal finance",
    "travel",
    "fitness",
    "small business",
    "gaming",
    "logistics",
];

/// A mutation batch request
#[derive(Debug, Clone)]
pub struct MutationSpec {
    /// Explicit parent ideas; `None` selects the top-ranked ideas
    pub parent_ids: Option<Vec<IdeaId>>,
    /// Variants to produce per parent
    pub per_parent: usize,
}

impl MutationSpec {
    /// Request `per_parent` variants of the session's top-ranked ideas
    #[inline]
    #[must_use]
    pub fn top_ranked(per_parent: usize) -> Self {
        Self {
            parent_ids: None,
            per_parent,
        }
    }

    /// Request `per_parent` variants of explicitly chosen parents
    #[inline]
    #[must_use]
    pub fn explicit(parent_ids: Vec<IdeaId>, per_parent: usize) -> Self {
        Self {
            parent_ids: Some(parent_ids),
            per_parent,
        }
    }
}

/// Generates crossover and repurposing variants from parent ideas
pub struct MutationEngine {
    ideas: Arc<dyn ScoredRepository<Idea>>,
    mutations: Arc<dyn ScoredRepository<Mutation>>,
    generator: Arc<dyn ConceptGenerator>,
    config: EvolutionConfig,
}

impl MutationEngine {
    /// Create a new mutation engine over the given collaborators
    #[must_use]
    pub fn new(
        ideas: Arc<dyn ScoredRepository<Idea>>,
        mutations: Arc<dyn ScoredRepository<Mutation>>,
        generator: Arc<dyn ConceptGenerator>,
        config: EvolutionConfig,
    ) -> Self {
        Self {
            ideas,
            mutations,
            generator,
            config,
        }
    }

    /// Produce and persist a batch of mutations for a session
    ///
    /// Per parent, `floor(n/2)` slots go to crossover (paired with a
    /// distinct second parent) and the remainder to repurposing. When
    /// only one parent resolves, all slots fall back to repurposing.
    ///
    /// # Errors
    /// `InvalidState` when no parent ideas resolve. Generation failures
    /// are absorbed into deterministic fallback variants.
    pub async fn generate(
        &self,
        session_id: SessionId,
        spec: MutationSpec,
    ) -> Result<Vec<Mutation>, EngineError> {
        let parents = self.resolve_parents(session_id, spec.parent_ids).await?;
        if parents.is_empty() {
            return Err(EngineError::InvalidState(
                "no parent ideas available for mutation".to_string(),
            ));
        }
        if spec.per_parent == 0 {
            return Ok(Vec::new());
        }

        tracing::info!(
            %session_id,
            parents = parents.len(),
            per_parent = spec.per_parent,
            "generating mutation batch"
        );

        let mut batch = Vec::new();
        for (index, parent) in parents.iter().enumerate() {
            let crossover_slots = if parents.len() >= 2 {
                spec.per_parent / 2
            } else {
                // No secondary idea: every slot repurposes instead.
                0
            };
            let repurpose_slots = spec.per_parent - crossover_slots;

            if crossover_slots > 0 {
                let secondary = &parents[(index + 1) % parents.len()];
                batch.extend(
                    self.crossover(session_id, parent, secondary, crossover_slots)
                        .await,
                );
            }
            if repurpose_slots > 0 {
                batch.extend(self.repurpose(session_id, parent, repurpose_slots).await);
            }
        }

        Ok(self.mutations.create_batch(batch).await?)
    }

    /// Record a user rating (1–5) for a mutation
    ///
    /// # Errors
    /// `InvalidState` for out-of-range ratings (checked before any load),
    /// `NotFound` for unknown mutations, `OwnershipMismatch` when the
    /// mutation belongs to a different session.
    pub async fn rate(
        &self,
        session_id: SessionId,
        mutation_id: MutationId,
        rating: u8,
    ) -> Result<Mutation, EngineError> {
        if !(1..=5).contains(&rating) {
            return Err(EngineError::InvalidState(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }

        let mut mutation = self
            .mutations
            .get(mutation_id)
            .await?
            .ok_or_else(|| EngineError::not_found("mutation", mutation_id))?;
        if mutation.session_id != session_id {
            return Err(EngineError::ownership("mutation", mutation_id, session_id));
        }

        mutation.score = f64::from(rating);
        Ok(self.mutations.update(mutation).await?)
    }

    async fn resolve_parents(
        &self,
        session_id: SessionId,
        explicit: Option<Vec<IdeaId>>,
    ) -> Result<Vec<Idea>, EngineError> {
        match explicit {
            Some(ids) => {
                // Explicit ids win; order is preserved, foreign-session and
                // unknown ids are dropped.
                let mut parents = Vec::with_capacity(ids.len());
                for id in ids {
                    if let Some(idea) = self.ideas.get(id).await? {
                        if idea.session_id == session_id {
                            parents.push(idea);
                        }
                    }
                }
                Ok(parents)
            }
            None => Ok(self
                .ideas
                .top_by_score(session_id, self.config.limits.default_top_parents)
                .await?),
        }
    }

    async fn crossover(
        &self,
        session_id: SessionId,
        primary: &Idea,
        secondary: &Idea,
        count: usize,
    ) -> Vec<Mutation> {
        let user_prompt = prompt::crossover_user_prompt(primary, secondary, count);
        let parents = vec![primary.id, secondary.id];

        let mut variants = match self
            .request_variants(CROSSOVER_SYSTEM_PROMPT, &user_prompt)
            .await
        {
            Ok(replies) => replies
                .into_iter()
                .take(count)
                .map(|reply| {
                    Mutation::new(
                        session_id,
                        parents.clone(),
                        MutationType::Crossover,
                        reply.title,
                        reply.description,
                        reply.mutation_rationale,
                    )
                })
                .collect(),
            Err(err) => {
                tracing::warn!(
                    %session_id,
                    error = %err,
                    "crossover generation failed, using deterministic fallback"
                );
                Vec::new()
            }
        };

        // Top up short or failed batches so the caller always gets `count`.
        for variant in variants.len()..count {
            variants.push(fallback_crossover(session_id, primary, secondary, variant));
        }
        variants
    }

    async fn repurpose(
        &self,
        session_id: SessionId,
        parent: &Idea,
        count: usize,
    ) -> Vec<Mutation> {
        let user_prompt = prompt::repurposing_user_prompt(parent, count);

        let mut variants = match self
            .request_variants(REPURPOSING_SYSTEM_PROMPT, &user_prompt)
            .await
        {
            Ok(replies) => replies
                .into_iter()
                .take(count)
                .map(|reply| {
                    Mutation::new(
                        session_id,
                        vec![parent.id],
                        MutationType::Repurposing,
                        reply.title,
                        reply.description,
                        reply.mutation_rationale,
                    )
                })
                .collect(),
            Err(err) => {
                tracing::warn!(
                    %session_id,
                    error = %err,
                    "repurposing generation failed, using deterministic fallback"
                );
                Vec::new()
            }
        };

        for variant in variants.len()..count {
            variants.push(fallback_repurpose(session_id, parent, variant));
        }
        variants
    }

    async fn request_variants(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Vec<MutationReply>, GenerationError> {
        let text = self.generator.generate(system_prompt, user_prompt).await?;
        serde_json::from_str(prompt::strip_code_fences(&text))
            .map_err(|e| GenerationError::Malformed(e.to_string()))
    }
}

fn fallback_crossover(
    session_id: SessionId,
    primary: &Idea,
    secondary: &Idea,
    variant: usize,
) -> Mutation {
    let title = if variant == 0 {
        format!("{} meets {}", primary.title, secondary.title)
    } else {
        format!(
            "{} meets {} (take {})",
            primary.title,
            secondary.title,
            variant + 1
        )
    };
    Mutation::new(
        session_id,
        vec![primary.id, secondary.id],
        MutationType::Crossover,
        title,
        format!(
            "A hybrid concept that pairs the core of \"{}\" with the audience and reach of \
             \"{}\".",
            primary.title, secondary.title
        ),
        format!(
            "Combines the strongest traits of both parents: {} and {}.",
            primary.dna.join(", "),
            secondary.dna.join(", ")
        ),
    )
}

fn fallback_repurpose(session_id: SessionId, parent: &Idea, variant: usize) -> Mutation {
    let domain = FALLBACK_DOMAINS[variant % FALLBACK_DOMAINS.len()];
    Mutation::new(
        session_id,
        vec![parent.id],
        MutationType::Repurposing,
        format!("{} for {}", parent.title, domain),
        format!(
            "\"{}\" rebuilt around the needs of the {} space, keeping its core mechanic intact.",
            parent.title, domain
        ),
        format!("Transplants the proven mechanic into {domain}."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_crossover_links_both_parents() {
        let session = SessionId::new();
        let a = Idea::new(session, "Alpha", "d", 1, vec!["ai".into()]);
        let b = Idea::new(session, "Beta", "d", 1, vec!["iot".into()]);

        let mutation = fallback_crossover(session, &a, &b, 0);
        assert_eq!(mutation.parent_ids, vec![a.id, b.id]);
        assert_eq!(mutation.kind, MutationType::Crossover);
        assert_eq!(mutation.title, "Alpha meets Beta");
        assert_eq!(mutation.score, 0.0);
    }

    #[test]
    fn fallback_repurpose_cycles_domains() {
        let session = SessionId::new();
        let parent = Idea::new(session, "Alpha", "d", 1, vec![]);

        let first = fallback_repurpose(session, &parent, 0);
        let wrapped = fallback_repurpose(session, &parent, FALLBACK_DOMAINS.len());
        assert_eq!(first.title, wrapped.title);
        assert_eq!(first.parent_ids, vec![parent.id]);
    }

    #[test]
    fn mutation_spec_constructors() {
        let spec = MutationSpec::top_ranked(4);
        assert!(spec.parent_ids.is_none());
        assert_eq!(spec.per_parent, 4);

        let id = IdeaId::new();
        let spec = MutationSpec::explicit(vec![id], 2);
        assert_eq!(spec.parent_ids.unwrap(), vec![id]);
    }
}
