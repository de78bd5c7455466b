use std::sync::Arc;

use async_trait::async_trait;
use edgesite::application::backend::{BackendError, ContentBackend, GraphqlQuery};
use edgesite::application::fetcher::{ContentFetcher, FetchPolicy};
use edgesite::domain::documents::ContentKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use serial_test::serial;

static SNAPSHOTTER: Lazy<Snapshotter> = Lazy::new(|| {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    snapshotter
});

/// Answers every single-document lookup with a miss and every list with a
/// transport failure.
struct MissingBackend;

#[async_trait]
impl ContentBackend for MissingBackend {
    async fn execute(&self, query: &GraphqlQuery) -> Result<Value, BackendError> {
        if query.operation_name.ends_with("List") {
            Err(BackendError::transport("connection refused"))
        } else {
            Ok(json!({ "userEvent": null }))
        }
    }
}

fn counter(name: &str, labels: &[(&str, &str)]) -> u64 {
    SNAPSHOTTER
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(composite_key, _, _, _)| {
            let key = composite_key.key();
            key.name() == name
                && labels.iter().all(|(label, value)| {
                    key.labels()
                        .any(|candidate| candidate.key() == *label && candidate.value() == *value)
                })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => count,
            _ => 0,
        })
        .sum()
}

fn fetcher() -> ContentFetcher {
    Lazy::force(&SNAPSHOTTER);
    ContentFetcher::new(Arc::new(MissingBackend), FetchPolicy::default())
}

#[tokio::test]
#[serial]
async fn numeric_miss_counts_fallback_and_not_found() {
    let fetcher = fetcher();
    let fallback_before = counter("edgesite_fetch_fallback_total", &[("kind", "event")]);
    let missing_before = counter("edgesite_fetch_not_found_total", &[("kind", "event")]);

    assert!(fetcher.document(ContentKind::Event, "42").await.is_none());

    assert_eq!(
        counter("edgesite_fetch_fallback_total", &[("kind", "event")]),
        fallback_before + 1
    );
    assert_eq!(
        counter("edgesite_fetch_not_found_total", &[("kind", "event")]),
        missing_before + 1
    );
}

#[tokio::test]
#[serial]
async fn opaque_miss_skips_fallback_counter() {
    let fetcher = fetcher();
    let fallback_before = counter("edgesite_fetch_fallback_total", &[("kind", "event")]);

    assert!(fetcher.document(ContentKind::Event, "abc-123").await.is_none());

    assert_eq!(
        counter("edgesite_fetch_fallback_total", &[("kind", "event")]),
        fallback_before
    );
}

#[tokio::test]
#[serial]
async fn failed_lists_count_failures_by_operation() {
    let fetcher = fetcher();
    let labels = [
        ("kind", "service"),
        ("operation", "list"),
        ("reason", "transport"),
    ];
    let before = counter("edgesite_fetch_failure_total", &labels);

    assert!(fetcher.collection(ContentKind::Service).await.is_empty());

    assert_eq!(counter("edgesite_fetch_failure_total", &labels), before + 1);
}
