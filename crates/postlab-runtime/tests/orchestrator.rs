use async_trait::async_trait;
use postlab_core::{
    BodyType, CoreError, CoreResult, DispatchCall, DispatchOutcome, Dispatcher, Entity, HttpMethod,
    NewParam, NewResponse, ParamUpdate, ResponseUpdate, ValidationError,
};
use postlab_runtime::{Orchestrator, SaveRequest};
use postlab_store::SqlStore;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

/// Replays one canned outcome for every call and records what it was asked to send.
struct ScriptedDispatcher {
    outcome: Option<DispatchOutcome>,
    calls: Mutex<Vec<DispatchCall>>,
}

impl ScriptedDispatcher {
    fn returning(outcome: DispatchOutcome) -> Arc<Self> {
        Arc::new(Self { outcome: Some(outcome), calls: Mutex::new(Vec::new()) })
    }

    /// Fails locally, the way a dispatcher does when it cannot build the call
    fn broken() -> Arc<Self> {
        Arc::new(Self { outcome: None, calls: Mutex::new(Vec::new()) })
    }

    fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for ScriptedDispatcher {
    async fn dispatch(&self, call: &DispatchCall) -> CoreResult<DispatchOutcome> {
        self.calls.lock().unwrap().push(call.clone());
        self.outcome
            .clone()
            .ok_or_else(|| CoreError::Invalid("cannot build outbound call".to_string()))
    }
}

/// Parks inside `dispatch` until released, so a test can act while the call is in flight.
#[derive(Default)]
struct GatedDispatcher {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl Dispatcher for GatedDispatcher {
    async fn dispatch(&self, _call: &DispatchCall) -> CoreResult<DispatchOutcome> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(DispatchOutcome::Completed { status: 200, body: json!({"ok": true}) })
    }
}

struct Harness {
    orchestrator: Orchestrator,
    store: SqlStore,
    dispatcher: Arc<ScriptedDispatcher>,
    _dir: TempDir,
}

async fn open_store(dir: &TempDir) -> SqlStore {
    let url = format!("sqlite://{}", dir.path().join("postlab.db").display());
    SqlStore::new(&url).await.unwrap()
}

async fn harness(dispatcher: Arc<ScriptedDispatcher>) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let orchestrator = Orchestrator::new(store.clone(), dispatcher.clone());
    Harness { orchestrator, store, dispatcher, _dir: dir }
}

fn completed(status: u16, body: JsonValue) -> Arc<ScriptedDispatcher> {
    ScriptedDispatcher::returning(DispatchOutcome::Completed { status, body })
}

async fn count(store: &SqlStore, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(store.pool())
        .await
        .unwrap()
}

async fn assert_empty(store: &SqlStore) {
    for table in ["requests", "params", "responses"] {
        assert_eq!(count(store, table).await, 0, "{} should be empty", table);
    }
}

fn definition(method: &str, body: Option<JsonValue>) -> SaveRequest {
    SaveRequest {
        url: "https://api.example.com/items".to_string(),
        method: method.to_string(),
        body,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_save_and_send_persists_request_and_response() {
    let h = harness(completed(201, json!({"id": 99, "tags": ["a", "b"]}))).await;
    let collection = h.orchestrator.create_collection("inventory").await.unwrap();

    let mut input = definition("POST", Some(json!({"name": "widget"})));
    input.collection_id = Some(collection.id);
    let outcome = h.orchestrator.save_and_send(input).await.unwrap();

    assert_eq!(outcome.status, 201);
    assert_eq!(outcome.method, HttpMethod::Post);
    assert_eq!(outcome.body_type, Some(BodyType::Raw));
    assert_eq!(outcome.body, Some(json!({"name": "widget"})));
    assert_eq!(outcome.collection_id, Some(collection.id));

    assert_eq!(count(&h.store, "requests").await, 1);
    assert_eq!(count(&h.store, "responses").await, 1);

    let response = h.orchestrator.get_response(outcome.response_id).await.unwrap();
    assert_eq!(response.request_id, outcome.id);
    assert_eq!(response.status_code, Some(201));
    assert_eq!(response.body, json!({"id": 99, "tags": ["a", "b"]}));
}

#[tokio::test]
async fn test_body_methods_without_body_write_nothing() {
    let h = harness(completed(200, json!(null))).await;

    for method in ["POST", "PUT", "PATCH"] {
        for body in [None, Some(json!({})), Some(json!(null)), Some(json!(""))] {
            let err = h.orchestrator.save_and_send(definition(method, body)).await.unwrap_err();
            assert!(
                matches!(err, CoreError::Validation(ValidationError::MissingBody(_))),
                "{}: {:?}",
                method,
                err
            );
        }
    }

    assert_empty(&h.store).await;
    assert!(h.dispatcher.calls().is_empty());
}

#[tokio::test]
async fn test_get_and_delete_ignore_body_and_send_params_as_query() {
    let h = harness(completed(200, json!({"ok": true}))).await;

    for method in ["GET", "DELETE"] {
        let mut input = definition(method, Some(json!({"ignored": true})));
        input.params = Some(BTreeMap::from([("page".to_string(), "2".to_string())]));
        let outcome = h.orchestrator.save_and_send(input).await.unwrap();
        assert_eq!(outcome.body, None);
        assert_eq!(outcome.body_type, None);

        let stored = h.orchestrator.get_request(outcome.id).await.unwrap();
        assert_eq!(stored.body, None);
        assert_eq!(stored.bodytype, None);
    }

    for call in h.dispatcher.calls() {
        assert_eq!(call.body, None);
        assert_eq!(call.query.get("page").map(String::as_str), Some("2"));
    }
    assert_eq!(count(&h.store, "params").await, 2);
}

#[tokio::test]
async fn test_body_methods_do_not_send_params_as_query() {
    let h = harness(completed(200, json!(null))).await;

    let mut input = definition("PUT", Some(json!({"qty": 4})));
    input.bodytype = Some("form".to_string());
    input.params = Some(BTreeMap::from([("dry_run".to_string(), "1".to_string())]));
    let outcome = h.orchestrator.save_and_send(input).await.unwrap();

    let calls = h.dispatcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].bodytype, BodyType::Form);
    assert_eq!(calls[0].body, Some(json!({"qty": 4})));
    assert!(calls[0].query.is_empty());

    let params = h.orchestrator.list_params(outcome.id).await.unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].key, "dry_run");
}

#[tokio::test]
async fn test_unknown_collection_writes_nothing() {
    let h = harness(completed(200, json!(null))).await;

    let mut input = definition("POST", Some(json!({"a": 1})));
    input.collection_id = Some(404);
    let err = h.orchestrator.save_and_send(input).await.unwrap_err();

    assert!(matches!(err, CoreError::NotFound(_)), "{:?}", err);
    assert_empty(&h.store).await;
    assert!(h.dispatcher.calls().is_empty());
}

#[tokio::test]
async fn test_network_error_rolls_back_everything() {
    let h = harness(ScriptedDispatcher::returning(DispatchOutcome::NetworkError(
        "connection refused".to_string(),
    )))
    .await;

    let mut input = definition("POST", Some(json!({"a": 1})));
    input.params = Some(BTreeMap::from([("k".to_string(), "v".to_string())]));
    let err = h.orchestrator.save_and_send(input).await.unwrap_err();

    match err {
        CoreError::Dispatch(reason) => assert_eq!(reason, "connection refused"),
        other => panic!("expected dispatch error, got {:?}", other),
    }
    assert_eq!(h.dispatcher.calls().len(), 1);
    assert_empty(&h.store).await;
}

#[tokio::test]
async fn test_rate_limited_rolls_back_and_is_distinct() {
    let h = harness(ScriptedDispatcher::returning(DispatchOutcome::RateLimited)).await;

    let err = h.orchestrator.save_and_send(definition("GET", None)).await.unwrap_err();

    assert!(matches!(err, CoreError::RateLimited));
    assert_empty(&h.store).await;
}

#[tokio::test]
async fn test_local_dispatch_failure_rolls_back() {
    let h = harness(ScriptedDispatcher::broken()).await;

    let err = h
        .orchestrator
        .save_and_send(definition("PATCH", Some(json!({"a": 1}))))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Invalid(_)));
    assert_empty(&h.store).await;
}

#[tokio::test]
async fn test_storage_failure_after_request_insert_rolls_back() {
    let h = harness(completed(200, json!({"ok": true}))).await;
    sqlx::query("DROP TABLE responses").execute(h.store.pool()).await.unwrap();

    let mut input = definition("POST", Some(json!({"a": 1})));
    input.params = Some(BTreeMap::from([
        ("k1".to_string(), "v1".to_string()),
        ("k2".to_string(), "v2".to_string()),
    ]));
    let err = h.orchestrator.save_and_send(input).await.unwrap_err();

    assert!(matches!(err, CoreError::Db(_)), "{:?}", err);
    assert!(!err.is_client_error());
    assert_eq!(count(&h.store, "requests").await, 0);
    assert_eq!(count(&h.store, "params").await, 0);
}

#[tokio::test]
async fn test_in_flight_dispatch_does_not_block_other_writes() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let gate = Arc::new(GatedDispatcher::default());
    let orchestrator = Orchestrator::new(store.clone(), gate.clone());

    let in_flight = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.save_and_send(definition("GET", None)).await }
    });
    gate.entered.notified().await;

    // Well under the pool's busy timeout
    let created = tokio::time::timeout(Duration::from_secs(2), orchestrator.create_collection("unrelated"))
        .await
        .expect("write blocked by an in-flight dispatch")
        .unwrap();
    assert_eq!(created.name, "unrelated");
    assert_eq!(count(&store, "requests").await, 0);

    gate.release.notify_one();
    let outcome = in_flight.await.unwrap().unwrap();
    assert_eq!(outcome.status, 200);
    assert_eq!(count(&store, "requests").await, 1);
    assert_eq!(count(&store, "responses").await, 1);
}

#[tokio::test]
async fn test_collection_deleted_during_dispatch_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let gate = Arc::new(GatedDispatcher::default());
    let orchestrator = Orchestrator::new(store.clone(), gate.clone());
    let collection = orchestrator.create_collection("short-lived").await.unwrap();

    let in_flight = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let mut input = definition("POST", Some(json!({"a": 1})));
        input.collection_id = Some(collection.id);
        async move { orchestrator.save_and_send(input).await }
    });
    gate.entered.notified().await;

    orchestrator.delete_collection(collection.id).await.unwrap();
    gate.release.notify_one();

    let err = in_flight.await.unwrap().unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)), "{:?}", err);
    assert_eq!(
        err.to_string(),
        CoreError::not_found(Entity::Collection, collection.id).to_string()
    );
    assert_empty(&store).await;
}

#[tokio::test]
async fn test_remote_error_status_is_still_persisted() {
    let h = harness(completed(500, json!("upstream exploded"))).await;

    let outcome = h.orchestrator.save_and_send(definition("GET", None)).await.unwrap();

    assert_eq!(outcome.status, 500);
    let response = h.orchestrator.get_response(outcome.response_id).await.unwrap();
    assert_eq!(response.status_code, Some(500));
    assert_eq!(response.body, json!("upstream exploded"));
}

#[tokio::test]
async fn test_delete_collection_cascades_and_is_not_repeatable() {
    let h = harness(completed(200, json!({"ok": true}))).await;
    let collection = h.orchestrator.create_collection("bulk").await.unwrap();
    let other = h.orchestrator.create_collection("untouched").await.unwrap();

    // 3 requests, each with 2 params and 2 responses
    for _ in 0..3 {
        let mut input = definition("GET", None);
        input.collection_id = Some(collection.id);
        input.params = Some(BTreeMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]));
        let outcome = h.orchestrator.save_and_send(input).await.unwrap();
        h.orchestrator
            .save_response(NewResponse {
                request_id: outcome.id,
                body: json!({"replayed": true}),
                status_code: Some(200),
            })
            .await
            .unwrap();
    }

    let mut survivor = definition("GET", None);
    survivor.collection_id = Some(other.id);
    h.orchestrator.save_and_send(survivor).await.unwrap();

    let summary = h.orchestrator.delete_collection(collection.id).await.unwrap();
    assert_eq!(summary.collections, 1);
    assert_eq!(summary.requests, 3);
    assert_eq!(summary.params, 6);
    assert_eq!(summary.responses, 6);

    assert_eq!(count(&h.store, "collections").await, 1);
    assert_eq!(count(&h.store, "requests").await, 1);
    assert_eq!(count(&h.store, "responses").await, 1);

    let again = h.orchestrator.delete_collection(collection.id).await.unwrap_err();
    assert!(matches!(again, CoreError::NotFound(_)));
    assert_eq!(count(&h.store, "requests").await, 1);
}

#[tokio::test]
async fn test_delete_empty_collection() {
    let h = harness(completed(200, json!(null))).await;
    let collection = h.orchestrator.create_collection("empty").await.unwrap();

    let summary = h.orchestrator.delete_collection(collection.id).await.unwrap();
    assert_eq!(summary.collections, 1);
    assert_eq!(summary.requests, 0);
    assert!(matches!(
        h.orchestrator.get_collection(collection.id).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_request_cascades() {
    let h = harness(completed(200, json!(null))).await;

    let mut input = definition("DELETE", None);
    input.params = Some(BTreeMap::from([("force".to_string(), "true".to_string())]));
    let outcome = h.orchestrator.save_and_send(input).await.unwrap();

    let summary = h.orchestrator.delete_request(outcome.id).await.unwrap();
    assert_eq!(summary.requests, 1);
    assert_eq!(summary.params, 1);
    assert_eq!(summary.responses, 1);
    assert_empty(&h.store).await;

    assert!(matches!(
        h.orchestrator.delete_request(outcome.id).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_empty_updates_fail_before_storage() {
    let h = harness(completed(200, json!(null))).await;

    // Ids that do not exist: validation must win over the missing row
    assert!(matches!(
        h.orchestrator.update_param(77, ParamUpdate::default()).await,
        Err(CoreError::Validation(ValidationError::EmptyUpdate))
    ));
    assert!(matches!(
        h.orchestrator.update_response(77, ResponseUpdate::default()).await,
        Err(CoreError::Validation(ValidationError::EmptyUpdate))
    ));
    assert!(matches!(
        h.orchestrator.update_collection_name(77, None).await,
        Err(CoreError::Validation(ValidationError::EmptyUpdate))
    ));
}

#[tokio::test]
async fn test_partial_updates_touch_only_given_fields() {
    let h = harness(completed(200, json!({"v": 1}))).await;
    let outcome = h.orchestrator.save_and_send(definition("GET", None)).await.unwrap();

    let param = h
        .orchestrator
        .add_param(NewParam {
            key: "limit".to_string(),
            value: "10".to_string(),
            request_id: outcome.id,
        })
        .await
        .unwrap();
    let updated = h
        .orchestrator
        .update_param(param.id, ParamUpdate { key: None, value: Some("25".to_string()) })
        .await
        .unwrap();
    assert_eq!(updated.key, "limit");
    assert_eq!(updated.value, "25");

    let response = h
        .orchestrator
        .update_response(
            outcome.response_id,
            ResponseUpdate { body: None, status_code: Some(304) },
        )
        .await
        .unwrap();
    assert_eq!(response.status_code, Some(304));
    assert_eq!(response.body, json!({"v": 1}));

    let collection = h.orchestrator.create_collection("old").await.unwrap();
    let renamed = h
        .orchestrator
        .update_collection_name(collection.id, Some("new".to_string()))
        .await
        .unwrap();
    assert_eq!(renamed.name, "new");

    assert!(matches!(
        h.orchestrator
            .update_param(9_999, ParamUpdate { key: Some("k".to_string()), value: None })
            .await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_children_require_existing_request() {
    let h = harness(completed(200, json!(null))).await;

    let err = h
        .orchestrator
        .add_param(NewParam { key: "k".to_string(), value: "v".to_string(), request_id: 5 })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));

    let err = h
        .orchestrator
        .save_response(NewResponse { request_id: 5, body: json!({}), status_code: None })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));

    assert!(matches!(h.orchestrator.list_params(5).await, Err(CoreError::NotFound(_))));
    assert_empty(&h.store).await;
}

#[tokio::test]
async fn test_reads_report_not_found_for_empty_results() {
    let h = harness(completed(200, json!(null))).await;

    assert!(matches!(h.orchestrator.list_collections().await, Err(CoreError::NotFound(_))));

    let collection = h.orchestrator.create_collection("fresh").await.unwrap();
    assert_eq!(h.orchestrator.list_collections().await.unwrap().len(), 1);
    assert!(matches!(
        h.orchestrator.list_collection_requests(collection.id).await,
        Err(CoreError::NotFound(_))
    ));
    assert!(matches!(
        h.orchestrator.list_collection_requests(collection.id + 1).await,
        Err(CoreError::NotFound(_))
    ));

    let outcome = h.orchestrator.save_and_send(definition("GET", None)).await.unwrap();
    assert!(matches!(h.orchestrator.list_params(outcome.id).await, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_response_body_round_trips_as_structured_json() {
    let h = harness(completed(200, json!(null))).await;
    let outcome = h.orchestrator.save_and_send(definition("GET", None)).await.unwrap();

    let body = json!({"nested": {"list": [1, 2.5, "three", null, false]}, "empty": {}});
    let saved = h
        .orchestrator
        .save_response(NewResponse { request_id: outcome.id, body: body.clone(), status_code: Some(200) })
        .await
        .unwrap();

    let loaded = h.orchestrator.get_response(saved.id).await.unwrap();
    assert_eq!(loaded.body, body);

    h.orchestrator.delete_response(saved.id).await.unwrap();
    assert!(matches!(
        h.orchestrator.delete_response(saved.id).await,
        Err(CoreError::NotFound(_))
    ));
}
