//! Error types for the Strand engines
//!
//! The taxonomy the boundary layer sees:
//! - `NotFound`: a referenced session/idea/mutation is absent
//! - `InvalidState`: the request is rejected before any write
//! - `OwnershipMismatch`: the entity belongs to a different session
//! - `Store`: a storage fault bubbled up
//!
//! Transient generation failures never appear here; the engines absorb
//! them into deterministic fallback output.

use strand_store::StoreError;
use strand_types::SessionId;

/// Engine error surfaced to the caller
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Referenced entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind ("session", "idea", "mutation", ...)
        kind: &'static str,
        /// Entity id
        id: String,
    },

    /// Request rejected before any mutation of state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Entity belongs to a different session than the one stated
    #[error("{kind} {id} does not belong to session {session}")]
    OwnershipMismatch {
        /// Entity kind
        kind: &'static str,
        /// Entity id
        id: String,
        /// Session the caller stated
        session: SessionId,
    },

    /// Storage fault
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Create a `NotFound` error
    #[inline]
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create an `OwnershipMismatch` error
    #[inline]
    pub fn ownership(kind: &'static str, id: impl ToString, session: SessionId) -> Self {
        Self::OwnershipMismatch {
            kind,
            id: id.to_string(),
            session,
        }
    }

    /// Whether this is an absence error
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is a pre-write rejection
    #[inline]
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    /// Whether this is an ownership rejection
    #[inline]
    #[must_use]
    pub fn is_ownership_mismatch(&self) -> bool {
        matches!(self, Self::OwnershipMismatch { .. })
    }
}
