//! Sanctions-list entity matching engine.
//!
//! Normalizes names and identifiers, screens query entities against an
//! in-memory watchlist index with a phonetic prefilter and a weighted
//! Jaro-Winkler scorer, and exposes single-query search plus parallel
//! batch screening. Transport, list ingestion, and scheduling all live
//! outside this crate.

pub mod batch;
pub mod config;
pub mod entity;
pub mod error;
pub mod gold_set;
pub mod index;
pub mod normalize;
pub mod phonetic;
pub mod prepared;
pub mod query;
pub mod scorer;
pub mod search;
pub mod similarity;
pub mod trace;

pub use batch::BatchScreener;
pub use config::{EngineConfig, SimilarityConfig, WeightConfig};
pub use entity::{Address, Contact, CryptoAddress, Entity, EntityDetails, EntityType, GovernmentId, Source};
pub use error::{MatchError, MatchResult};
pub use index::EntityIndex;
pub use query::{
    BatchItem, BatchItemResult, BatchItemStatus, BatchRequest, BatchResponse, BatchStatistics,
    SearchRequest, SearchResponse, SearchResult,
};
pub use scorer::{EntityScorer, ScoreBreakdown};
pub use search::SearchService;
pub use trace::{ScoringTrace, TraceRepository, TraceSummary};
