//! Request/response types for the search and batch surfaces (§6).
//!
//! Plain serde structs with no transport binding; the (out of scope) HTTP
//! layer serializes these directly.

use serde::{Deserialize, Serialize};

use crate::entity::{Address, Contact, CryptoAddress, EntityType, GovernmentId, Source};
use crate::error::{MatchError, MatchResult};
use crate::scorer::ScoreBreakdown;

fn default_limit() -> usize {
    10
}

const MAX_LIMIT: usize = 100;
pub const MAX_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub name: String,
    #[serde(default)]
    pub alt_names: Vec<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub government_ids: Vec<GovernmentId>,
    #[serde(default)]
    pub crypto_addresses: Vec<CryptoAddress>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub min_match: Option<f64>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub trace: bool,
}

impl SearchRequest {
    pub fn new(name: impl Into<String>) -> Self {
        SearchRequest {
            name: name.into(),
            alt_names: Vec::new(),
            source: None,
            entity_type: None,
            addresses: Vec::new(),
            government_ids: Vec::new(),
            crypto_addresses: Vec::new(),
            contact: Contact::default(),
            min_match: None,
            limit: default_limit(),
            trace: false,
        }
    }

    pub fn validate(&self) -> MatchResult<()> {
        if self.name.trim().is_empty() {
            return Err(MatchError::Validation("name must not be empty".into()));
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(MatchError::Validation(format!(
                "limit must be in 1..={MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        if let Some(min_match) = self.min_match {
            if !(0.0..=1.0).contains(&min_match) {
                return Err(MatchError::Validation(format!(
                    "min_match must be in [0,1], got {min_match}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub entity_id: String,
    pub source: Source,
    pub source_id: String,
    pub matched_name: String,
    pub breakdown: ScoreBreakdownDto,
    pub overall: f64,
}

/// Wire form of [`ScoreBreakdown`]; kept separate so the internal scorer
/// type can evolve without touching the serialized shape.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreBreakdownDto {
    pub name: f64,
    pub alt_name: f64,
    pub government_id: f64,
    pub crypto: f64,
    pub contact: f64,
    pub address: f64,
    pub date: f64,
}

impl From<ScoreBreakdown> for ScoreBreakdownDto {
    fn from(b: ScoreBreakdown) -> Self {
        ScoreBreakdownDto {
            name: b.name,
            alt_name: b.alt_name,
            government_id: b.government_id,
            crypto: b.crypto,
            contact: b.contact,
            address: b.address,
            date: b.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub trace_session_id: Option<uuid::Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub request_id: String,
    pub request: SearchRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub items: Vec<BatchItem>,
    #[serde(default)]
    pub trace: bool,
}

impl BatchRequest {
    pub fn validate(&self) -> MatchResult<()> {
        if self.items.is_empty() {
            return Err(MatchError::Validation("batch must contain at least one item".into()));
        }
        if self.items.len() > MAX_BATCH_SIZE {
            return Err(MatchError::Validation(format!(
                "batch size {} exceeds maximum of {MAX_BATCH_SIZE}",
                self.items.len()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    Matched,
    NoMatches,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub request_id: String,
    pub status: BatchItemStatus,
    pub results: Vec<SearchResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BatchStatistics {
    pub total_items: usize,
    pub matched_count: usize,
    pub no_match_count: usize,
    pub error_count: usize,
    pub total_matches: usize,
    pub high_confidence_count: usize,
    pub medium_confidence_count: usize,
    pub low_confidence_count: usize,
    pub average_top_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub items: Vec<BatchItemResult>,
    pub statistics: BatchStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        let req = SearchRequest::new("   ");
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_limit_over_max() {
        let mut req = SearchRequest::new("John Smith");
        req.limit = 101;
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_oversized_batch() {
        let items: Vec<BatchItem> = (0..MAX_BATCH_SIZE + 1)
            .map(|i| BatchItem {
                request_id: i.to_string(),
                request: SearchRequest::new("a"),
            })
            .collect();
        let batch = BatchRequest { items, trace: false };
        assert!(batch.validate().is_err());
    }

    #[test]
    fn accepts_default_limit() {
        let req = SearchRequest::new("John Smith");
        assert!(req.validate().is_ok());
        assert_eq!(req.limit, 10);
    }
}
