//! Testing utilities for the Strand workspace
//!
//! Shared fixtures, in-memory store bundles, and generator doubles.

#![allow(missing_docs)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use strand_genai::{ConceptGenerator, GenerationError};
use strand_store::{MemoryPersonalityStore, MemoryRepository, MemorySessionStore};
use strand_types::record::{
    FeatureVariation, Idea, Mutation, Swipe, SwipeDirection, SwipeSession, Synthesis,
};
use strand_types::{IdeaId, SessionId, UserId};

/// Every in-memory store an engine could need, pre-wired
pub struct TestWorld {
    pub ideas: Arc<MemoryRepository<Idea>>,
    pub swipes: Arc<MemoryRepository<Swipe>>,
    pub mutations: Arc<MemoryRepository<Mutation>>,
    pub variations: Arc<MemoryRepository<FeatureVariation>>,
    pub syntheses: Arc<MemoryRepository<Synthesis>>,
    pub sessions: Arc<MemorySessionStore>,
    pub profiles: Arc<MemoryPersonalityStore>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            ideas: Arc::new(MemoryRepository::new()),
            swipes: Arc::new(MemoryRepository::new()),
            mutations: Arc::new(MemoryRepository::new()),
            variations: Arc::new(MemoryRepository::new()),
            syntheses: Arc::new(MemoryRepository::new()),
            sessions: Arc::new(MemorySessionStore::new()),
            profiles: Arc::new(MemoryPersonalityStore::new()),
        }
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_user() -> UserId {
    UserId::new("test-user")
}

pub fn idea_with_dna(session: SessionId, title: &str, dna: &[&str], score: f64) -> Idea {
    Idea::new(
        session,
        title,
        format!("{title} description"),
        1,
        dna.iter().map(|s| s.to_string()).collect(),
    )
    .with_score(score)
}

pub fn swipe_on(
    idea: &Idea,
    user: &UserId,
    direction: SwipeDirection,
    duration_ms: u64,
) -> Swipe {
    Swipe::new(
        idea.id,
        idea.session_id,
        user.clone(),
        direction,
        duration_ms,
    )
}

pub fn variation_with_features(
    session: SessionId,
    title: &str,
    features: &[&str],
) -> FeatureVariation {
    FeatureVariation::new(
        session,
        IdeaId::new(),
        title,
        format!("{title} description"),
        features.iter().map(|s| s.to_string()).collect(),
    )
}

pub fn active_session(user: &UserId) -> SwipeSession {
    SwipeSession::new(user.clone())
}

/// Generator double that replays queued replies in order, then fails
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
        }
    }
}

#[async_trait]
impl ConceptGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, GenerationError> {
        self.replies
            .lock()
            .expect("scripted generator lock poisoned")
            .pop_front()
            .ok_or_else(|| GenerationError::Unavailable("script exhausted".to_string()))
    }
}

/// Generator double that always fails
pub struct FailingGenerator;

#[async_trait]
impl ConceptGenerator for FailingGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(
            "simulated backend outage".to_string(),
        ))
    }
}

/// Generator double that answers with text no parser accepts
pub struct GarbageGenerator;

#[async_trait]
impl ConceptGenerator for GarbageGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, GenerationError> {
        Ok("I'm sorry, I can't produce JSON today.".to_string())
    }
}
