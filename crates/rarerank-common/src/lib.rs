//! rarerank-common — Shared types and errors used across all rarerank crates.

pub mod entities;
pub mod error;

// Re-export commonly used types
pub use entities::{
    CriteriaScore, Criterion, DiseaseIdentity, DiseaseScore, Justifications, MAX_SCORE, MIN_SCORE,
};
pub use error::{RareRankError, Result};
