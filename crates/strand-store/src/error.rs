//! Store errors
//!
//! Absence on lookups is `Option`, never an error; errors here are real
//! storage faults or updates against records that do not exist.

/// Storage-layer error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Update targeted a record that was never created (or was deleted)
    #[error("cannot update missing record: {0}")]
    MissingRecord(String),

    /// Backend fault (network, quota, serialization)
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether a retry could plausibly succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
