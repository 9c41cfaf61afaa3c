//! # CodeRef Query
//!
//! Public read surface over one snapshot: filtered element lookup with
//! optional relationship flags, and impact analysis bucketed by traversal
//! depth.
//!
//! A [`QueryEngine`] owns the index and graph it was built from; callers
//! hold the engine and get read-only views. Snapshots are immutable, so one
//! engine per scan replaces any process-wide singleton.

mod engine;
mod error;
mod types;

pub use engine::QueryEngine;
pub use error::{QueryError, Result};
pub use types::{
    AffectedElement, FindRequest, FindResponse, FoundElement, ImpactLevel, ImpactResponse,
    ImpactSummary,
};
