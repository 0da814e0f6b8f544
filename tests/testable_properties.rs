//! Crate-level integration tests covering the engine's documented
//! properties: score range, self-score, source-id short-circuit, exact-id
//! boost, phonetic-filter monotonicity, min_match/limit/ordering, trace
//! boundedness, and batch order preservation.

use std::sync::Arc;

use watchlist_match::{
    BatchItem, BatchRequest, BatchScreener, Entity, EntityIndex, EntityScorer, EntityType,
    EngineConfig, GovernmentId, SearchRequest, SearchService, Source, TraceRepository,
};

fn wide_index() -> Arc<EntityIndex> {
    let index = EntityIndex::new();
    index
        .replace_all(vec![
            person("1", "Nicolas Maduro Moros"),
            person("2", "Nicolas Maduro"),
            person("3", "Nicolas Maduro M"),
            person("4", "John Smith"),
            person("5", "Jane Doe"),
        ])
        .unwrap();
    Arc::new(index)
}

fn person(id: &str, name: &str) -> Entity {
    Entity::new(id, name, EntityType::Person, Source::OfacSdn).prepare()
}

#[test]
fn score_is_always_in_unit_interval() {
    let scorer = EntityScorer::new(EngineConfig::default());
    let pairs = [
        ("Nicolas Maduro", "Nicolas Maduro Moros"),
        ("Smith", "Jones"),
        ("", "Anything"),
        ("Jean-Pierre de la Fontaine", "Jeanpierre Fontaine"),
    ];
    for (a, b) in pairs {
        let breakdown = scorer.score(&person("a", a), &person("b", b));
        assert!((0.0..=1.0).contains(&breakdown.overall), "{a} vs {b} -> {breakdown:?}");
    }
}

#[test]
fn self_score_is_near_one() {
    let scorer = EntityScorer::new(EngineConfig::default());
    for name in ["Nicolas Maduro Moros", "Acme Trading LLC", "Hugo Chavez Frias"] {
        let e = person("e", name);
        let breakdown = scorer.score(&e, &e);
        assert!(breakdown.overall >= 0.99, "{name} self-score was {breakdown:?}");
    }
}

#[test]
fn matching_source_id_dominates_regardless_of_other_fields() {
    let scorer = EntityScorer::new(EngineConfig::default());
    let a = Entity::new("a", "Totally Different One", EntityType::Person, Source::OfacSdn)
        .with_source_id("X1")
        .prepare();
    let b = Entity::new("b", "Another Name Entirely", EntityType::Person, Source::OfacSdn)
        .with_source_id("X1")
        .prepare();
    let breakdown = scorer.score(&a, &b);
    assert_eq!(breakdown.overall, 1.0);
}

#[test]
fn exact_government_id_match_boosts_a_weak_name() {
    let scorer = EntityScorer::new(EngineConfig::default());
    let gov_id = || GovernmentId {
        identifier: "AB123456".into(),
        id_type: "passport".into(),
        country: None,
    };
    let a = Entity::new("a", "Alpha Name", EntityType::Person, Source::OfacSdn)
        .with_government_ids(vec![gov_id()])
        .prepare();
    let b = Entity::new("b", "Zeta Surname", EntityType::Person, Source::OfacSdn)
        .with_government_ids(vec![gov_id()])
        .prepare();
    let breakdown = scorer.score(&a, &b);
    assert!(
        breakdown.overall >= 0.7 + 0.3 * breakdown.name.max(breakdown.alt_name) - 1e-9,
        "{breakdown:?}"
    );
}

#[test]
fn phonetic_filter_never_raises_a_score() {
    let enabled = EngineConfig::default();
    let mut disabled = EngineConfig::default();
    disabled.similarity.phonetic_filtering_disabled = true;

    let scorer_enabled = EntityScorer::new(enabled);
    let scorer_disabled = EntityScorer::new(disabled);

    for (a, b) in [("Smith", "Jones"), ("Katherine", "Catherine"), ("Xu", "Zephyr")] {
        let with_filter = scorer_enabled.score(&person("a", a), &person("b", b)).overall;
        let without_filter = scorer_disabled.score(&person("a", a), &person("b", b)).overall;
        assert!(with_filter <= without_filter + 1e-9, "{a} vs {b}: {with_filter} > {without_filter}");
    }
}

fn indexed_search() -> (Arc<EntityIndex>, SearchService) {
    let index = EntityIndex::new();
    index
        .replace_all(vec![
            person("1", "Nicolas Maduro Moros"),
            person("2", "John Smith"),
            person("3", "Jon Smyth"),
            person("4", "Totally Unrelated Name"),
        ])
        .unwrap();
    let index = Arc::new(index);
    let service = SearchService::new(index.clone(), EngineConfig::default(), Arc::new(TraceRepository::default()));
    (index, service)
}

#[test]
fn every_returned_result_meets_min_match() {
    let (_, service) = indexed_search();
    let mut request = SearchRequest::new("John Smith");
    request.min_match = Some(0.8);
    let response = service.search(&request).unwrap();
    for result in &response.results {
        assert!(result.overall >= 0.8, "{result:?}");
    }
}

#[test]
fn limit_bounds_result_count() {
    let (_, service) = indexed_search();
    let mut request = SearchRequest::new("Smith");
    request.min_match = Some(0.0);
    request.limit = 2;
    let response = service.search(&request).unwrap();
    assert!(response.results.len() <= 2);
}

#[test]
fn results_are_sorted_non_increasing() {
    let (_, service) = indexed_search();
    let mut request = SearchRequest::new("Smith");
    request.min_match = Some(0.0);
    request.limit = 100;
    let response = service.search(&request).unwrap();
    for pair in response.results.windows(2) {
        assert!(pair[0].overall >= pair[1].overall);
    }
}

#[test]
fn trace_events_are_bounded_by_candidate_count() {
    let (index, service) = indexed_search();
    let mut request = SearchRequest::new("Smith");
    request.min_match = Some(0.0);
    request.trace = true;
    let response = service.search(&request).unwrap();
    assert!(response.trace_session_id.is_some());
    assert!(response.results.len() <= index.size());
}

#[test]
fn trace_event_count_matches_the_limit_truncated_result_set_not_the_candidate_set() {
    // Several candidates share a compatible phonetic prefix and a
    // nonzero name score against "Nicolas", but `limit` caps the final
    // result set well below the candidate count; trace volume must track
    // the former, not the latter.
    let index = wide_index();
    let traces = Arc::new(TraceRepository::default());
    let service = SearchService::new(index, EngineConfig::default(), traces.clone());

    let mut request = SearchRequest::new("Nicolas Maduro Moros");
    request.min_match = Some(0.0);
    request.limit = 2;
    request.trace = true;
    let response = service.search(&request).unwrap();

    assert_eq!(response.results.len(), 2);
    let session_id = response.trace_session_id.unwrap();
    let trace = traces.get(session_id).unwrap();
    assert_eq!(trace.events.len(), response.results.len());
}

#[test]
fn batch_level_trace_flag_persists_a_trace_per_item() {
    let index = wide_index();
    let traces = Arc::new(TraceRepository::default());
    let screener = BatchScreener::new(index, EngineConfig::default(), traces.clone());

    let mut request = SearchRequest::new("Nicolas Maduro Moros");
    request.min_match = Some(0.0);
    let batch = BatchRequest {
        items: vec![BatchItem {
            request_id: "only".into(),
            request,
        }],
        trace: true,
    };
    let response = screener.screen(&batch).unwrap();
    assert_eq!(response.items.len(), 1);
    assert!(traces.len() > 0, "batch-level trace=true should start at least one session");
}

#[test]
fn batch_results_preserve_request_order() {
    let index = EntityIndex::new();
    index
        .replace_all(vec![person("1", "Nicolas Maduro Moros")])
        .unwrap();
    let screener = BatchScreener::new(Arc::new(index), EngineConfig::default(), Arc::new(TraceRepository::default()));

    let ids = ["z", "a", "m", "b"];
    let items: Vec<BatchItem> = ids
        .iter()
        .map(|id| {
            let mut request = SearchRequest::new("Nicolas Maduro Moros");
            request.min_match = Some(0.0);
            BatchItem {
                request_id: id.to_string(),
                request,
            }
        })
        .collect();

    let response = screener.screen(&BatchRequest { items, trace: false }).unwrap();
    let returned_ids: Vec<&str> = response.items.iter().map(|i| i.request_id.as_str()).collect();
    assert_eq!(returned_ids, ids);
}

#[test]
fn name_comparison_is_approximately_symmetric_for_name_only_entities() {
    // Best-pair token matching weights by the *query* side's token lengths,
    // so exact symmetry isn't guaranteed - only the blended full-string
    // Jaro-Winkler component is. We check the two directions land close
    // together rather than bit-identical.
    let scorer = EntityScorer::new(EngineConfig::default());
    let a = person("a", "Jean Pierre Martin");
    let b = person("b", "Jean-Pierre Martin");
    let forward = scorer.score(&a, &b).overall;
    let backward = scorer.score(&b, &a).overall;
    assert!((forward - backward).abs() < 0.2, "forward={forward} backward={backward}");
}
