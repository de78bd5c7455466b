use std::{num::NonZeroU32, sync::Arc, time::Duration};

use edgesite::application::backend::{BackendError, ContentBackend};
use edgesite::application::fetcher::{ContentFetcher, FetchPolicy};
use edgesite::application::queries::{self, ListRequest, LookupStrategy};
use edgesite::domain::documents::{ContentKind, LookupKey};
use edgesite::infra::graphql::GraphqlBackend;
use reqwest::Url;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

const GRAPHQL_PATH: &str = "/graphql";

fn endpoint(server: &MockServer) -> Url {
    Url::parse(&format!("{}{GRAPHQL_PATH}", server.uri())).expect("mock endpoint url")
}

fn fetcher_for(server: &MockServer, timeout: Duration) -> ContentFetcher {
    let backend = GraphqlBackend::new(endpoint(server), timeout).expect("client builds");
    ContentFetcher::new(
        Arc::new(backend),
        FetchPolicy {
            timeout,
            ..FetchPolicy::default()
        },
    )
}

#[tokio::test]
async fn numeric_id_falls_back_to_legacy_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("EventByDocumentId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"userEvent": null}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("EventByNumericId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"userEvent": {
            "documentId": "k3x9",
            "Title": "Spring seminar",
            "Date": "2024-03-01",
            "Description": [{"type": "paragraph", "children": [{"type": "text", "text": "Register now"}]}]
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    let document = fetcher_for(&server, Duration::from_secs(5))
        .document(ContentKind::Event, "42")
        .await
        .expect("fallback finds the document");

    assert_eq!(document.document_id.as_deref(), Some("k3x9"));
    assert_eq!(document.description.plain_text(), "Register now");
}

#[tokio::test]
async fn opaque_id_miss_does_not_fall_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("ServiceByDocumentId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"service": null}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("ServiceByNumericId"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let found = fetcher_for(&server, Duration::from_secs(5))
        .document(ContentKind::Service, "abc-123")
        .await;
    assert!(found.is_none());
}

#[tokio::test]
async fn list_request_sends_filters_and_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("Visible: { eq: true }"))
        .and(body_string_contains("Order:asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"locations": [
            {"documentId": "l1", "Title": "Tokyo HQ", "Order": 1, "Map": "https://maps.test/embed?q=tokyo"},
            {"documentId": "l2", "Title": "Osaka", "Order": 2, "Map": null}
        ]}})))
        .expect(1)
        .mount(&server)
        .await;

    let documents = fetcher_for(&server, Duration::from_secs(5))
        .collection(ContentKind::Location)
        .await;

    let titles: Vec<_> = documents.iter().map(|doc| doc.title.as_str()).collect();
    assert_eq!(titles, vec!["Tokyo HQ", "Osaka"]);
    assert!(!documents[0].map.is_none());
}

#[tokio::test]
async fn server_errors_degrade_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, Duration::from_secs(5));
    assert!(fetcher.news().await.is_empty());
    assert!(fetcher.document(ContentKind::Profile, "7").await.is_none());
}

#[tokio::test]
async fn slow_backend_is_cut_off() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"services": []}}))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let documents = fetcher_for(&server, Duration::from_millis(200))
        .collection(ContentKind::Service)
        .await;

    assert!(documents.is_empty());
    assert!(started.elapsed() < Duration::from_millis(800));
}

#[tokio::test]
async fn backend_maps_status_and_graphql_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("ProfileList"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("EventList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Forbidden access"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("ServiceList"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let backend = GraphqlBackend::new(endpoint(&server), Duration::from_secs(5)).expect("client builds");
    let limit = NonZeroU32::new(10).expect("limit");

    let status = backend
        .execute(&queries::collection(&ListRequest::new(ContentKind::Profile, limit)))
        .await
        .expect_err("502 is an error");
    assert!(matches!(status, BackendError::Status { status: 502, ref body } if body == "bad gateway"));

    let graphql = backend
        .execute(&queries::collection(&ListRequest::new(ContentKind::Event, limit)))
        .await
        .expect_err("errors array is an error");
    assert!(
        matches!(graphql, BackendError::Graphql { ref messages } if messages == &vec!["Forbidden access".to_string()])
    );

    let decode = backend
        .execute(&queries::collection(&ListRequest::new(ContentKind::Service, limit)))
        .await
        .expect_err("html body is an error");
    assert_eq!(decode.reason(), "decode");
}

#[tokio::test]
async fn backend_posts_operation_name_and_variables() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("\"operationName\":\"LocationByDocumentId\""))
        .and(body_string_contains("\"variables\":{\"id\":\"loc-1\"}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"location": {"documentId": "loc-1"}}})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = GraphqlBackend::new(endpoint(&server), Duration::from_secs(5)).expect("client builds");
    let key = LookupKey::parse("loc-1").expect("key");
    let data = backend
        .execute(&queries::single_document(
            ContentKind::Location,
            &key,
            LookupStrategy::DocumentId,
        ))
        .await
        .expect("query succeeds");

    assert_eq!(data["location"]["documentId"], "loc-1");
}
