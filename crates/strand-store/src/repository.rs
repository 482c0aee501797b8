//! Repository capability traits
//!
//! One generic repository per session-scoped record type, plus dedicated
//! stores for sessions (keyed by session id) and personalities (keyed by
//! user). Engines hold these as `Arc<dyn ...>` strategy objects.

use crate::error::StoreError;
use async_trait::async_trait;
use strand_types::personality::ProductPersonality;
use strand_types::record::{Scored, SessionRecord, SwipeSession};
use strand_types::{SessionId, UserId};

/// CRUD over one session-scoped record type
#[async_trait]
pub trait Repository<R: SessionRecord>: Send + Sync {
    /// Persist a new record
    async fn create(&self, record: R) -> Result<R, StoreError>;

    /// Persist a batch of records together
    async fn create_batch(&self, records: Vec<R>) -> Result<Vec<R>, StoreError>;

    /// Look up a record; absence is `None`, never an error
    async fn get(&self, id: R::Id) -> Result<Option<R>, StoreError>;

    /// All records belonging to a session, creation order
    async fn get_by_session(&self, session: SessionId) -> Result<Vec<R>, StoreError>;

    /// Replace an existing record
    async fn update(&self, record: R) -> Result<R, StoreError>;

    /// Remove a record; removing an absent record is a no-op
    async fn delete(&self, id: R::Id) -> Result<(), StoreError>;
}

/// Repositories over scored records additionally rank by score
#[async_trait]
pub trait ScoredRepository<R: Scored>: Repository<R> {
    /// Top `n` records of a session by descending score
    ///
    /// Ties break by creation time ascending, then id, per
    /// [`strand_types::rank::top_by_score`].
    async fn top_by_score(&self, session: SessionId, n: usize) -> Result<Vec<R>, StoreError>;
}

/// Store for swipe sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session
    async fn create(&self, session: SwipeSession) -> Result<SwipeSession, StoreError>;

    /// Look up a session
    async fn get(&self, id: SessionId) -> Result<Option<SwipeSession>, StoreError>;

    /// Replace an existing session
    async fn update(&self, session: SwipeSession) -> Result<SwipeSession, StoreError>;
}

/// Store for the one-per-user personality aggregate
#[async_trait]
pub trait PersonalityStore: Send + Sync {
    /// Look up a user's profile
    async fn get(&self, user: &UserId) -> Result<Option<ProductPersonality>, StoreError>;

    /// Create or replace a user's profile
    async fn upsert(&self, profile: ProductPersonality) -> Result<ProductPersonality, StoreError>;

    /// Explicit profile reset; absent profiles are a no-op
    async fn delete(&self, user: &UserId) -> Result<(), StoreError>;
}
