//! Subquery executor tests: counts and the candidate stream.

mod common;

use common::{records, ScriptedCatalog};
use futures_util::TryStreamExt;
use granule_search::execution::{Candidate, SubqueryExecutor};
use granule_search::{ExtraParams, QueryParam, RetrievalError, SubquerySpec};
use serde_json::json;
use std::sync::Arc;

fn executor(catalog: &Arc<ScriptedCatalog>, page_size: usize) -> SubqueryExecutor<ScriptedCatalog> {
    let spec = SubquerySpec::new(vec![QueryParam::new("beamMode", "A")]);
    SubqueryExecutor::new(Arc::clone(catalog), &spec, &ExtraParams::new("ASF", page_size))
}

fn mode_a(entries: Vec<Option<serde_json::Value>>) -> Arc<ScriptedCatalog> {
    Arc::new(ScriptedCatalog::new().with_subquery(&[("beamMode", "A")], entries))
}

#[tokio::test]
async fn test_candidate_stream_spans_pages_with_placeholder() {
    let mut entries = records("a", 3);
    entries.insert(1, None);
    let catalog = mode_a(entries);
    let executor = executor(&catalog, 2);

    let candidates: Vec<Candidate> = executor
        .get_results()
        .into_stream()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(
        candidates,
        vec![
            Candidate::Record(json!({"granule": "a-0"})),
            Candidate::Placeholder,
            Candidate::Record(json!({"granule": "a-1"})),
            Candidate::Record(json!({"granule": "a-2"})),
        ]
    );

    // two full pages, then an empty one ends the sequence
    let requests = catalog.page_requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].scroll_id.is_none());
    assert_eq!(requests[1].scroll_id.as_deref(), Some("beamMode=A#2"));
}

#[tokio::test]
async fn test_get_results_restarts_from_first_page() {
    let catalog = mode_a(records("a", 3));
    let executor = executor(&catalog, 10);

    let first: Vec<Candidate> = executor.get_results().into_stream().try_collect().await.unwrap();
    let second: Vec<Candidate> = executor.get_results().into_stream().try_collect().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_candidate_stream_ends_after_error() {
    let catalog = Arc::new(
        ScriptedCatalog::new()
            .with_subquery(&[("beamMode", "A")], records("a", 4))
            .failing_on(&[("beamMode", "A")], 1),
    );
    let executor = executor(&catalog, 2);

    let mut results = executor.get_results();
    assert!(results.next_candidate().await.unwrap().is_some());
    assert!(results.next_candidate().await.unwrap().is_some());
    let err = results.next_candidate().await.unwrap_err();
    assert!(matches!(err, RetrievalError::Status { status: 500, .. }));
    assert!(results.next_candidate().await.unwrap().is_none());
}

#[tokio::test]
async fn test_executor_count_uses_count_params() {
    let catalog = mode_a(records("a", 7));
    let executor = executor(&catalog, 2);

    assert_eq!(executor.get_count().await.unwrap(), 7);
    let seen = catalog.seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_count());
    assert!(seen[0].param("scroll").is_none());
    // extra params first, subquery pairs last
    assert_eq!(seen[0].params.last(), Some(&QueryParam::new("beamMode", "A")));
}
