//! rarerank-ranker — Rare-disease prioritization scoring engine.
//!
//! Six fixed criteria are scored per disease on a 0–10 scale, combined into a
//! weighted index and ranked across the whole batch.

pub mod curated_provider;
pub mod justification;
pub mod mock_provider;
pub mod normalise;
pub mod provider;
pub mod ranker;
pub mod scorer;
pub mod weights;

pub use provider::ReferenceData;
pub use ranker::{BatchOutcome, BatchRanker, ScoringFailure};
pub use scorer::CriteriaScorer;
pub use weights::WeightVector;
