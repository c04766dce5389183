use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use importer_core::{ErrorKind, FetchOutcome};
use importer_engine::{
    AccountFetcher, FetchSettings, InventorySource, MemorySlotStore, RawResponse, ReqwestSource,
    SlotStore, TransportError,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn slots(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn fetcher_for(server: &MockServer) -> (AccountFetcher, Arc<MemorySlotStore>) {
    let source = ReqwestSource::new(FetchSettings {
        base_url: server.uri(),
        ..FetchSettings::default()
    })
    .unwrap();
    let store = Arc::new(MemorySlotStore::new());
    (AccountFetcher::new(Arc::new(source), store.clone()), store)
}

/// Counts calls and answers every one of them with a transport error.
#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl InventorySource for CountingSource {
    async fn get_inventory(&self, _account_id: &str) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TransportError {
            message: "connection refused".to_string(),
        })
    }
}

#[tokio::test]
async fn empty_slots_skip_without_network_or_writes() {
    let source = Arc::new(CountingSource::default());
    let store = Arc::new(MemorySlotStore::new());
    let fetcher = AccountFetcher::new(source.clone(), store.clone());

    let outcome = fetcher.fetch("B", &[]).await;

    assert_eq!(
        outcome,
        FetchOutcome::Skipped {
            account_id: "B".to_string()
        }
    );
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn success_writes_identical_text_to_every_slot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/A"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"inventory": [{"id": 1}, {"id": 2, "value": 5}], "uid": "A"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    let (fetcher, store) = fetcher_for(&server);

    let outcome = fetcher.fetch("A", &slots(&["first", "second"])).await;

    assert_eq!(
        outcome,
        FetchOutcome::Success {
            account_id: "A".to_string()
        }
    );
    let expected = r#"[{"id":1},{"id":2,"value":5}]"#;
    assert_eq!(store.read("first").unwrap().as_deref(), Some(expected));
    assert_eq!(store.read("second").unwrap().as_deref(), Some(expected));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn non_200_fails_without_touching_slots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"inventory":[]}"#))
        .mount(&server)
        .await;
    let (fetcher, store) = fetcher_for(&server);
    store.write("slotA", "previous").unwrap();

    let outcome = fetcher.fetch("A", &slots(&["slotA"])).await;

    assert_eq!(
        outcome,
        FetchOutcome::Failure {
            account_id: "A".to_string(),
            kind: ErrorKind::HttpError(404),
            detail: "404".to_string(),
        }
    );
    assert_eq!(store.read("slotA").unwrap().as_deref(), Some("previous"));
}

#[tokio::test]
async fn other_success_codes_are_not_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let (fetcher, store) = fetcher_for(&server);

    let outcome = fetcher.fetch("A", &slots(&["slotA"])).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Failure {
            kind: ErrorKind::HttpError(204),
            ..
        }
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn invalid_json_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let (fetcher, store) = fetcher_for(&server);

    let outcome = fetcher.fetch("A", &slots(&["slotA"])).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Failure {
            kind: ErrorKind::ParseError,
            ..
        }
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn missing_inventory_is_a_schema_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items":[]}"#))
        .mount(&server)
        .await;
    let (fetcher, store) = fetcher_for(&server);

    let outcome = fetcher.fetch("A", &slots(&["slotA"])).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Failure {
            kind: ErrorKind::SchemaError,
            ..
        }
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let source = Arc::new(CountingSource::default());
    let store = Arc::new(MemorySlotStore::new());
    let fetcher = AccountFetcher::new(source.clone(), store.clone());

    let outcome = fetcher.fetch("A", &slots(&["slotA"])).await;

    assert_eq!(
        outcome,
        FetchOutcome::Failure {
            account_id: "A".to_string(),
            kind: ErrorKind::NetworkError,
            detail: "connection refused".to_string(),
        }
    );
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(store.is_empty());
}
