//! Persisted records for the evolution pipeline
//!
//! Defines the records the engines read and write:
//! - Ideas and swipes (input side)
//! - Swipe sessions with their selected sources
//! - Mutations, feature variations, and syntheses (output side)
//!
//! Record access traits (`SessionRecord`, `Scored`) sit at the bottom of
//! this module; the store crate is generic over them.

use crate::id::{IdeaId, MutationId, SessionId, SwipeId, SynthesisId, UserId, VariationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hard cap on DNA keywords per idea, enforced at construction
pub const MAX_DNA_KEYWORDS: usize = 20;

/// Swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    /// Dislike
    Left,
    /// Like
    Right,
    /// Super-like (extra-strength like signal)
    Up,
}

/// Swipe speed bucket, derived from duration by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeSpeed {
    /// Below the fast threshold
    Fast,
    /// Between the thresholds (inclusive boundaries)
    Medium,
    /// Above the slow threshold
    Slow,
}

/// A candidate app idea produced by batch generation
///
/// Content is immutable after creation; only the score changes as users
/// rate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    /// Idea identifier
    pub id: IdeaId,
    /// Owning session
    pub session_id: SessionId,
    /// Short pitch title
    pub title: String,
    /// Longer pitch description
    pub description: String,
    /// Generation batch this idea belongs to
    pub batch: u32,
    /// DNA keywords: trait tags joining the idea to bias maps (≤ 20)
    pub dna: Vec<String>,
    /// Current score
    pub score: f64,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

impl Idea {
    /// Create a new idea; DNA keywords beyond the cap are dropped
    #[must_use]
    pub fn new(
        session_id: SessionId,
        title: impl Into<String>,
        description: impl Into<String>,
        batch: u32,
        mut dna: Vec<String>,
    ) -> Self {
        dna.truncate(MAX_DNA_KEYWORDS);
        Self {
            id: IdeaId::new(),
            session_id,
            title: title.into(),
            description: description.into(),
            batch,
            dna,
            score: 0.0,
            created_at: Utc::now(),
        }
    }

    /// With an initial score
    #[inline]
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// First DNA keyword, if any (the disliked-pattern signal)
    #[inline]
    #[must_use]
    pub fn first_keyword(&self) -> Option<&str> {
        self.dna.first().map(String::as_str)
    }
}

/// A single recorded swipe interaction
///
/// Immutable once created. The speed bucket is not stored; it is derived
/// from `duration_ms` on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
    /// Swipe identifier
    pub id: SwipeId,
    /// Idea the swipe rated
    pub idea_id: IdeaId,
    /// Session the swipe happened in
    pub session_id: SessionId,
    /// User who swiped
    pub user_id: UserId,
    /// Direction
    pub direction: SwipeDirection,
    /// Interaction duration in milliseconds; caller guarantees > 0
    pub duration_ms: u64,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

impl Swipe {
    /// Record a new swipe
    #[must_use]
    pub fn new(
        idea_id: IdeaId,
        session_id: SessionId,
        user_id: UserId,
        direction: SwipeDirection,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: SwipeId::new(),
            idea_id,
            session_id,
            user_id,
            direction,
            duration_ms,
            created_at: Utc::now(),
        }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Accepting swipes and selections
    Active,
    /// Closed; further submissions are rejected
    Completed,
}

/// Typed reference to a synthesis input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceRef {
    /// A feature variation
    Variation(VariationId),
    /// A mutation
    Mutation(MutationId),
}

impl SourceRef {
    /// String key used in retained-element maps
    #[inline]
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            SourceRef::Variation(id) => id.to_string(),
            SourceRef::Mutation(id) => id.to_string(),
        }
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A user's swipe session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeSession {
    /// Session identifier
    pub id: SessionId,
    /// Owning user
    pub user_id: UserId,
    /// Lifecycle state
    pub status: SessionStatus,
    /// Sources the user selected for synthesis (1–10 once submitted)
    pub selected_sources: Vec<SourceRef>,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

impl SwipeSession {
    /// Open a new active session for a user
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            status: SessionStatus::Active,
            selected_sources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether the session still accepts submissions
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// Mutation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationType {
    /// Hybrid of two parent ideas
    Crossover,
    /// One parent's core mechanic transplanted into a new context
    Repurposing,
}

/// An idea variant produced by the mutation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mutation {
    /// Mutation identifier
    pub id: MutationId,
    /// Owning session
    pub session_id: SessionId,
    /// Parent idea ids: one for repurposing, two for crossover
    pub parent_ids: Vec<IdeaId>,
    /// Strategy that produced this variant
    pub kind: MutationType,
    /// Variant title
    pub title: String,
    /// Variant description
    pub description: String,
    /// Why this variant follows from its parent(s)
    pub rationale: String,
    /// User rating; starts at 0.0, set on rating (1–5)
    pub score: f64,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

impl Mutation {
    /// Create a new unrated mutation
    #[must_use]
    pub fn new(
        session_id: SessionId,
        parent_ids: Vec<IdeaId>,
        kind: MutationType,
        title: impl Into<String>,
        description: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id: MutationId::new(),
            session_id,
            parent_ids,
            kind,
            title: title.into(),
            description: description.into(),
            rationale: rationale.into(),
            score: 0.0,
            created_at: Utc::now(),
        }
    }
}

/// A feature-expanded take on a single idea
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVariation {
    /// Variation identifier
    pub id: VariationId,
    /// Owning session
    pub session_id: SessionId,
    /// Idea this variation expands
    pub source_idea_id: IdeaId,
    /// Variation title
    pub title: String,
    /// Variation description
    pub description: String,
    /// Named key features
    pub key_features: Vec<String>,
    /// User rating
    pub score: f64,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

impl FeatureVariation {
    /// Create a new feature variation
    #[must_use]
    pub fn new(
        session_id: SessionId,
        source_idea_id: IdeaId,
        title: impl Into<String>,
        description: impl Into<String>,
        key_features: Vec<String>,
    ) -> Self {
        Self {
            id: VariationId::new(),
            session_id,
            source_idea_id,
            title: title.into(),
            description: description.into(),
            key_features,
            score: 0.0,
            created_at: Utc::now(),
        }
    }
}

/// The merged pitch produced by the synthesis engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synthesis {
    /// Synthesis identifier
    pub id: SynthesisId,
    /// Owning session
    pub session_id: SessionId,
    /// Merged pitch title
    pub merged_title: String,
    /// Merged pitch description
    pub merged_description: String,
    /// Sentence explaining how the sources connect
    pub thematic_bridge: String,
    /// Source id → feature names kept from that source
    pub retained_elements: HashMap<String, Vec<String>>,
    /// The sources that were merged
    pub source_refs: Vec<SourceRef>,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

impl Synthesis {
    /// Create a new synthesis record
    #[must_use]
    pub fn new(
        session_id: SessionId,
        merged_title: impl Into<String>,
        merged_description: impl Into<String>,
        thematic_bridge: impl Into<String>,
        retained_elements: HashMap<String, Vec<String>>,
        source_refs: Vec<SourceRef>,
    ) -> Self {
        Self {
            id: SynthesisId::new(),
            session_id,
            merged_title: merged_title.into(),
            merged_description: merged_description.into(),
            thematic_bridge: thematic_bridge.into(),
            retained_elements,
            source_refs,
            created_at: Utc::now(),
        }
    }
}

/// Generic "idea source" view consumed by the synthesis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaSourceSummary {
    /// Source id as a string key
    pub id: String,
    /// Source title
    pub title: String,
    /// Source description
    pub description: String,
    /// Key features retained on the fallback path
    pub key_features: Vec<String>,
}

impl From<&FeatureVariation> for IdeaSourceSummary {
    fn from(variation: &FeatureVariation) -> Self {
        Self {
            id: variation.id.to_string(),
            title: variation.title.clone(),
            description: variation.description.clone(),
            key_features: variation.key_features.clone(),
        }
    }
}

impl From<&Mutation> for IdeaSourceSummary {
    fn from(mutation: &Mutation) -> Self {
        // A mutation carries no feature list of its own; its rationale is
        // the closest retained-element equivalent.
        let key_features = if mutation.rationale.is_empty() {
            Vec::new()
        } else {
            vec![mutation.rationale.clone()]
        };
        Self {
            id: mutation.id.to_string(),
            title: mutation.title.clone(),
            description: mutation.description.clone(),
            key_features,
        }
    }
}

/// Access trait for session-scoped persisted records
pub trait SessionRecord: Clone + Send + Sync + 'static {
    /// Typed record id
    type Id: Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static;

    /// Record id
    fn record_id(&self) -> Self::Id;
    /// Owning session
    fn session_id(&self) -> SessionId;
    /// Creation timestamp
    fn created_at(&self) -> DateTime<Utc>;
}

/// Session-scoped records that carry a mutable score
pub trait Scored: SessionRecord {
    /// Current score
    fn score(&self) -> f64;
    /// Replace the score
    fn set_score(&mut self, score: f64);
}

macro_rules! impl_session_record {
    ($record:ident, $id:ty) => {
        impl SessionRecord for $record {
            type Id = $id;

            #[inline]
            fn record_id(&self) -> Self::Id {
                self.id
            }

            #[inline]
            fn session_id(&self) -> SessionId {
                self.session_id
            }

            #[inline]
            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }
    };
}

macro_rules! impl_scored {
    ($record:ident) => {
        impl Scored for $record {
            #[inline]
            fn score(&self) -> f64 {
                self.score
            }

            #[inline]
            fn set_score(&mut self, score: f64) {
                self.score = score;
            }
        }
    };
}

impl_session_record!(Idea, IdeaId);
impl_session_record!(Swipe, SwipeId);
impl_session_record!(Mutation, MutationId);
impl_session_record!(FeatureVariation, VariationId);
impl_session_record!(Synthesis, SynthesisId);

impl_scored!(Idea);
impl_scored!(Mutation);
impl_scored!(FeatureVariation);
