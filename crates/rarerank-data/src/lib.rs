//! rarerank-data — Curated reference tables for rare-disease prioritization.
//!
//! Every table is read from disk once, when the [`CuratedStore`] is opened,
//! and kept as an immutable snapshot. Lookups never touch the filesystem, so a
//! store can be shared across scoring threads without locking.

pub mod disease_list;
pub mod error;
pub mod ordered;
pub mod store;
pub mod table;

pub use disease_list::load_disease_list;
pub use error::{DataError, Result};
pub use ordered::OrderedIdSet;
pub use store::{CuratedStore, DrugRegion, DrugType, TrialRegion};
