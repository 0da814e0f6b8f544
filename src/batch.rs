//! Parallel batch screening (§4.10).
//!
//! Items run concurrently on `rayon`'s work-stealing pool; results are
//! collected in the original request order regardless of completion order
//! (`par_iter().map().collect()` preserves index order). Each item gets its
//! own timeout budget: scoring runs on a detached worker thread and the
//! caller waits on a channel with a deadline, so a slow item times out for
//! its own result without blocking the batch on that thread's eventual
//! completion (a scoped join would wait for it regardless).

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::error::MatchError;
use crate::index::EntityIndex;
use crate::query::{
    BatchItem, BatchItemResult, BatchItemStatus, BatchRequest, BatchResponse, BatchStatistics,
};
use crate::search::SearchService;
use crate::trace::TraceRepository;

const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(30);

pub struct BatchScreener {
    service: Arc<SearchService>,
    item_timeout: Duration,
}

impl BatchScreener {
    pub fn new(index: Arc<EntityIndex>, config: EngineConfig, traces: Arc<TraceRepository>) -> Self {
        BatchScreener {
            service: Arc::new(SearchService::new(index, config, traces)),
            item_timeout: DEFAULT_ITEM_TIMEOUT,
        }
    }

    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = timeout;
        self
    }

    fn score_item(&self, item: &BatchItem, trace: bool) -> BatchItemResult {
        // §4.9: a malformed item (null/empty name) yields NO_MATCHES within
        // a batch, unlike the single-search surface where the same input is
        // a ValidationError (§7) — there is no per-item payload to reject
        // the whole batch over, so it is simply reported as nothing found.
        if item.request.name.trim().is_empty() {
            return BatchItemResult {
                request_id: item.request_id.clone(),
                status: BatchItemStatus::NoMatches,
                results: Vec::new(),
                error: None,
            };
        }

        let started = Instant::now();
        let service = self.service.clone();
        let mut request = item.request.clone();
        if trace {
            request.trace = true;
        }
        let (tx, rx) = mpsc::channel();

        let request_id = item.request_id.clone();
        std::thread::spawn(move || {
            // Catch panics so a single malformed item (e.g. a scorer bug
            // tripped by unexpected input) surfaces as an `ItemError`
            // result for that item instead of poisoning the batch.
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| service.search(&request)));
            let sendable = outcome.unwrap_or_else(|payload| {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "scorer panicked".to_string());
                Err(MatchError::Item { request_id, reason })
            });
            let _ = tx.send(sendable);
        });

        match rx.recv_timeout(self.item_timeout) {
            Err(_) => BatchItemResult {
                request_id: item.request_id.clone(),
                status: BatchItemStatus::Error,
                results: Vec::new(),
                error: Some(
                    MatchError::Timeout {
                        request_id: item.request_id.clone(),
                        elapsed: started.elapsed(),
                    }
                    .to_string(),
                ),
            },
            Ok(Err(err)) => BatchItemResult {
                request_id: item.request_id.clone(),
                status: BatchItemStatus::Error,
                results: Vec::new(),
                error: Some(err.to_string()),
            },
            Ok(Ok(response)) => {
                if response.results.is_empty() {
                    BatchItemResult {
                        request_id: item.request_id.clone(),
                        status: BatchItemStatus::NoMatches,
                        results: Vec::new(),
                        error: None,
                    }
                } else {
                    BatchItemResult {
                        request_id: item.request_id.clone(),
                        status: BatchItemStatus::Matched,
                        results: response.results,
                        error: None,
                    }
                }
            }
        }
    }

    #[tracing::instrument(skip_all, fields(item_count = request.items.len()))]
    pub fn screen(&self, request: &BatchRequest) -> Result<BatchResponse, MatchError> {
        request.validate()?;

        let items: Vec<BatchItemResult> = request
            .items
            .par_iter()
            .map(|item| self.score_item(item, request.trace))
            .collect();

        let statistics = compute_statistics(&items);
        tracing::info!(
            matched = statistics.matched_count,
            errors = statistics.error_count,
            "batch screening completed"
        );

        Ok(BatchResponse { items, statistics })
    }
}

fn compute_statistics(items: &[BatchItemResult]) -> BatchStatistics {
    let mut stats = BatchStatistics {
        total_items: items.len(),
        ..BatchStatistics::default()
    };

    let mut top_score_sum = 0.0;
    let mut top_score_count = 0usize;

    for item in items {
        match item.status {
            BatchItemStatus::Matched => stats.matched_count += 1,
            BatchItemStatus::NoMatches => stats.no_match_count += 1,
            BatchItemStatus::Error => stats.error_count += 1,
        }

        stats.total_matches += item.results.len();

        if let Some(top) = item.results.first() {
            top_score_sum += top.overall;
            top_score_count += 1;
            if top.overall >= 0.90 {
                stats.high_confidence_count += 1;
            } else if top.overall >= 0.75 {
                stats.medium_confidence_count += 1;
            } else {
                stats.low_confidence_count += 1;
            }
        }
    }

    stats.average_top_score = if top_score_count == 0 {
        0.0
    } else {
        top_score_sum / top_score_count as f64
    };

    stats
}
