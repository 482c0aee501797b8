//! Strand Store - repository capability for the evolution core
//!
//! Defines the persistence seams the engines depend on and the
//! DashMap-backed reference implementations. Lookups represent absence
//! as `Option`; storage faults surface as [`StoreError`].

pub mod error;
pub mod memory;
pub mod repository;

pub use error::StoreError;
pub use memory::{MemoryPersonalityStore, MemoryRepository, MemorySessionStore};
pub use repository::{PersonalityStore, Repository, ScoredRepository, SessionStore};
