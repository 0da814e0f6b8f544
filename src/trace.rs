//! Optional per-session scoring trace (§4.9).
//!
//! Tracing is opt-in per request. When enabled, every phase evaluated for
//! every candidate scored in the session is appended as an event; the
//! repository expires sessions after a TTL rather than growing without
//! bound. Storage is a `DashMap` so unrelated sessions never contend on the
//! same lock.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{MatchError, MatchResult};
use crate::scorer::ScoreBreakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringContext {
    Disabled,
    Enabled,
}

#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub candidate_id: String,
    pub breakdown: ScoreBreakdown,
    pub passed_threshold: bool,
}

#[derive(Debug, Clone)]
pub struct ScoringTrace {
    pub session_id: Uuid,
    pub query_name: String,
    pub events: Vec<TraceEvent>,
    created_at: Instant,
}

impl ScoringTrace {
    fn new(session_id: Uuid, query_name: String) -> Self {
        ScoringTrace {
            session_id,
            query_name,
            events: Vec::new(),
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TraceSummary {
    pub event_count: usize,
    pub passed_count: usize,
    pub average_overall: f64,
}

fn summarize(events: &[TraceEvent]) -> TraceSummary {
    let event_count = events.len();
    let passed_count = events.iter().filter(|e| e.passed_threshold).count();
    let average_overall = if event_count == 0 {
        0.0
    } else {
        events.iter().map(|e| e.breakdown.overall).sum::<f64>() / event_count as f64
    };
    TraceSummary {
        event_count,
        passed_count,
        average_overall,
    }
}

/// Keyed scoring-trace store with TTL expiry, default 24 hours (§4.9).
pub struct TraceRepository {
    sessions: DashMap<Uuid, ScoringTrace>,
    ttl: Duration,
}

impl Default for TraceRepository {
    fn default() -> Self {
        Self::new(Duration::from_secs(24 * 60 * 60))
    }
}

impl TraceRepository {
    pub fn new(ttl: Duration) -> Self {
        TraceRepository {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn start_session(&self, query_name: impl Into<String>) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions
            .insert(session_id, ScoringTrace::new(session_id, query_name.into()));
        tracing::debug!(%session_id, "scoring trace session started");
        session_id
    }

    pub fn record(
        &self,
        session_id: Uuid,
        candidate_id: impl Into<String>,
        breakdown: ScoreBreakdown,
        passed_threshold: bool,
    ) {
        if let Some(mut trace) = self.sessions.get_mut(&session_id) {
            trace.events.push(TraceEvent {
                candidate_id: candidate_id.into(),
                breakdown,
                passed_threshold,
            });
        }
    }

    pub fn get(&self, session_id: Uuid) -> MatchResult<ScoringTrace> {
        self.sweep_expired();
        self.sessions
            .get(&session_id)
            .map(|entry| entry.clone())
            .ok_or(MatchError::NotFound { session_id })
    }

    pub fn summary(&self, session_id: Uuid) -> MatchResult<TraceSummary> {
        let trace = self.get(session_id)?;
        Ok(summarize(&trace.events))
    }

    /// Drop every session whose TTL has elapsed. Runs opportunistically on
    /// read; there is no background sweeper thread.
    pub fn sweep_expired(&self) {
        let before = self.sessions.len();
        self.sessions.retain(|_, trace| !trace.is_expired(self.ttl));
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "expired scoring traces swept");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_lifecycle() {
        let repo = TraceRepository::default();
        let id = repo.start_session("Nicolas Maduro");
        repo.record(id, "c1", ScoreBreakdown::default(), false);
        repo.record(
            id,
            "c2",
            ScoreBreakdown {
                overall: 0.95,
                ..ScoreBreakdown::default()
            },
            true,
        );

        let trace = repo.get(id).unwrap();
        assert_eq!(trace.events.len(), 2);

        let summary = repo.summary(id).unwrap();
        assert_eq!(summary.event_count, 2);
        assert_eq!(summary.passed_count, 1);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let repo = TraceRepository::default();
        let err = repo.get(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, MatchError::NotFound { .. }));
    }

    #[test]
    fn ttl_expiry_removes_sessions() {
        let repo = TraceRepository::new(Duration::from_millis(1));
        let id = repo.start_session("ephemeral");
        std::thread::sleep(Duration::from_millis(5));
        assert!(repo.get(id).is_err());
    }
}
