//! DashMap-backed reference stores
//!
//! Used by tests and offline wiring. Production deployments swap in
//! backends over the same traits; engines never know the difference.

use crate::error::StoreError;
use crate::repository::{PersonalityStore, Repository, ScoredRepository, SessionStore};
use async_trait::async_trait;
use dashmap::DashMap;
use strand_types::personality::ProductPersonality;
use strand_types::rank;
use strand_types::record::{Scored, SessionRecord, SwipeSession};
use strand_types::{SessionId, UserId};

/// In-memory repository over one record type
#[derive(Debug)]
pub struct MemoryRepository<R: SessionRecord> {
    records: DashMap<R::Id, R>,
}

impl<R: SessionRecord> MemoryRepository<R> {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the repository is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: SessionRecord> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: SessionRecord> Repository<R> for MemoryRepository<R> {
    async fn create(&self, record: R) -> Result<R, StoreError> {
        self.records.insert(record.record_id(), record.clone());
        Ok(record)
    }

    async fn create_batch(&self, records: Vec<R>) -> Result<Vec<R>, StoreError> {
        for record in &records {
            self.records.insert(record.record_id(), record.clone());
        }
        Ok(records)
    }

    async fn get(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        Ok(self.records.get(&id).map(|entry| entry.clone()))
    }

    async fn get_by_session(&self, session: SessionId) -> Result<Vec<R>, StoreError> {
        let mut matches: Vec<R> = self
            .records
            .iter()
            .filter(|entry| entry.session_id() == session)
            .map(|entry| entry.clone())
            .collect();
        // DashMap iteration order is arbitrary; callers get creation order.
        matches.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.record_id().cmp(&b.record_id()))
        });
        Ok(matches)
    }

    async fn update(&self, record: R) -> Result<R, StoreError> {
        let id = record.record_id();
        if !self.records.contains_key(&id) {
            return Err(StoreError::MissingRecord(id.to_string()));
        }
        self.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: R::Id) -> Result<(), StoreError> {
        self.records.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl<R: Scored> ScoredRepository<R> for MemoryRepository<R> {
    async fn top_by_score(&self, session: SessionId, n: usize) -> Result<Vec<R>, StoreError> {
        let all = self.get_by_session(session).await?;
        Ok(rank::top_by_score(all, n))
    }
}

/// In-memory swipe-session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, SwipeSession>,
}

impl MemorySessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: SwipeSession) -> Result<SwipeSession, StoreError> {
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, id: SessionId) -> Result<Option<SwipeSession>, StoreError> {
        Ok(self.sessions.get(&id).map(|entry| entry.clone()))
    }

    async fn update(&self, session: SwipeSession) -> Result<SwipeSession, StoreError> {
        if !self.sessions.contains_key(&session.id) {
            return Err(StoreError::MissingRecord(session.id.to_string()));
        }
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }
}

/// In-memory personality store
#[derive(Debug, Default)]
pub struct MemoryPersonalityStore {
    profiles: DashMap<UserId, ProductPersonality>,
}

impl MemoryPersonalityStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonalityStore for MemoryPersonalityStore {
    async fn get(&self, user: &UserId) -> Result<Option<ProductPersonality>, StoreError> {
        Ok(self.profiles.get(user).map(|entry| entry.clone()))
    }

    async fn upsert(&self, profile: ProductPersonality) -> Result<ProductPersonality, StoreError> {
        self.profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn delete(&self, user: &UserId) -> Result<(), StoreError> {
        self.profiles.remove(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_types::record::Idea;

    #[tokio::test]
    async fn create_get_update_delete_round_trip() {
        let repo: MemoryRepository<Idea> = MemoryRepository::new();
        let session = SessionId::new();
        let idea = Idea::new(session, "t", "d", 1, vec![]);
        let id = idea.id;

        repo.create(idea.clone()).await.unwrap();
        assert!(repo.get(id).await.unwrap().is_some());

        let mut updated = idea;
        updated.score = 4.0;
        let stored = repo.update(updated).await.unwrap();
        assert_eq!(stored.score, 4.0);

        repo.delete(id).await.unwrap();
        assert!(repo.get(id).await.unwrap().is_none());
        // Deleting again is a no-op.
        repo.delete(id).await.unwrap();
    }

    #[tokio::test]
    async fn update_of_missing_record_errors() {
        let repo: MemoryRepository<Idea> = MemoryRepository::new();
        let idea = Idea::new(SessionId::new(), "t", "d", 1, vec![]);
        let err = repo.update(idea).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingRecord(_)));
    }

    #[tokio::test]
    async fn get_by_session_filters_and_orders() {
        let repo: MemoryRepository<Idea> = MemoryRepository::new();
        let session = SessionId::new();
        let other = SessionId::new();

        let first = repo.create(Idea::new(session, "first", "d", 1, vec![])).await.unwrap();
        repo.create(Idea::new(other, "elsewhere", "d", 1, vec![])).await.unwrap();
        let second = repo.create(Idea::new(session, "second", "d", 1, vec![])).await.unwrap();

        let found = repo.get_by_session(session).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, first.id);
        assert_eq!(found[1].id, second.id);
    }

    #[tokio::test]
    async fn top_by_score_ranks_descending() {
        let repo: MemoryRepository<Idea> = MemoryRepository::new();
        let session = SessionId::new();
        repo.create(Idea::new(session, "low", "d", 1, vec![]).with_score(1.0))
            .await
            .unwrap();
        repo.create(Idea::new(session, "high", "d", 1, vec![]).with_score(9.0))
            .await
            .unwrap();

        let top = repo.top_by_score(session, 1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].title, "high");
    }

    #[tokio::test]
    async fn personality_store_upsert_and_reset() {
        let store = MemoryPersonalityStore::new();
        let user = UserId::new("u1");
        assert!(store.get(&user).await.unwrap().is_none());

        let mut profile = ProductPersonality::new(user.clone());
        profile.apply_product_bias("ai", 0.3);
        store.upsert(profile).await.unwrap();
        assert!(store.get(&user).await.unwrap().is_some());

        store.delete(&user).await.unwrap();
        assert!(store.get(&user).await.unwrap().is_none());
    }
}
