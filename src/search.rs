//! Single-query search service (§4.8).

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::entity::{Entity, EntityType, Source};
use crate::error::MatchResult;
use crate::index::EntityIndex;
use crate::query::{SearchRequest, SearchResponse, SearchResult};
use crate::scorer::EntityScorer;
use crate::trace::{ScoringContext, TraceRepository};

fn build_query_entity(request: &SearchRequest) -> Entity {
    let entity_type = request.entity_type.unwrap_or(EntityType::Unknown);
    let source = request.source.clone().unwrap_or_else(|| Source::Other("query".into()));

    Entity::new("query", request.name.clone(), entity_type, source)
        .with_alt_names(request.alt_names.clone())
        .with_addresses(request.addresses.clone())
        .with_government_ids(request.government_ids.clone())
        .with_crypto_addresses(request.crypto_addresses.clone())
        .with_contact(request.contact.clone())
        .prepare()
}

/// Runs candidate scoring against the live index and returns ranked
/// results. Stateless aside from its handles; safe to clone and share.
pub struct SearchService {
    index: Arc<EntityIndex>,
    scorer: EntityScorer,
    traces: Arc<TraceRepository>,
}

impl SearchService {
    pub fn new(index: Arc<EntityIndex>, config: EngineConfig, traces: Arc<TraceRepository>) -> Self {
        SearchService {
            index,
            scorer: EntityScorer::new(config),
            traces,
        }
    }

    #[tracing::instrument(skip_all, fields(name = %request.name))]
    pub fn search(&self, request: &SearchRequest) -> MatchResult<SearchResponse> {
        request.validate()?;

        let min_match = request
            .min_match
            .unwrap_or(self.scorer.config().weights.minimum_score);

        let candidates: Vec<Arc<Entity>> = match (&request.source, &request.entity_type) {
            (Some(source), Some(entity_type)) => self
                .index
                .get_by_source(source)
                .into_iter()
                .filter(|e| e.entity_type == *entity_type)
                .collect(),
            (Some(source), None) => self.index.get_by_source(source),
            (None, Some(entity_type)) => self.index.get_by_type(*entity_type),
            (None, None) => self.index.get_all(),
        };

        let query_entity = build_query_entity(request);

        let context = if request.trace {
            ScoringContext::Enabled
        } else {
            ScoringContext::Disabled
        };
        let trace_session_id = match context {
            ScoringContext::Enabled => Some(self.traces.start_session(request.name.clone())),
            ScoringContext::Disabled => None,
        };

        let mut scored: Vec<(usize, Arc<Entity>, crate::scorer::ScoreBreakdown)> = Vec::new();
        for (order, candidate) in candidates.iter().enumerate() {
            let breakdown = self.scorer.score(&query_entity, candidate);
            if breakdown.overall >= min_match {
                scored.push((order, candidate.clone(), breakdown));
            }
        }

        // Stable descending sort on score; ties keep index-insertion order
        // thanks to `sort_by` being a stable sort over the original `order`.
        scored.sort_by(|a, b| b.2.overall.partial_cmp(&a.2.overall).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(request.limit);

        // Tracing happens only for the entities that made it into the final,
        // limit-truncated result set: event volume is bounded by `limit`,
        // not by the size of the candidate set that was scored.
        if let (ScoringContext::Enabled, Some(session_id)) = (context, trace_session_id) {
            for (_, candidate, breakdown) in &scored {
                self.traces.record(session_id, candidate.id.clone(), *breakdown, true);
            }
        }

        let results = scored
            .into_iter()
            .map(|(_, candidate, breakdown)| SearchResult {
                entity_id: candidate.id.clone(),
                source: candidate.source.clone(),
                source_id: candidate.source_id.clone(),
                matched_name: candidate.primary_name.clone(),
                breakdown: breakdown.into(),
                overall: breakdown.overall,
            })
            .collect();

        tracing::info!(candidate_count = candidates.len(), "search completed");

        Ok(SearchResponse {
            results,
            trace_session_id,
        })
    }
}
