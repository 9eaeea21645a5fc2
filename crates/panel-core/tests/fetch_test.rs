#![allow(clippy::unwrap_used)]
// Integration tests for `FetchController` and `MutationController`.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use panel_core::{
    ControllerOptions, FetchController, FetchState, MutationController, SettlementOrder,
};
use panel_api::{HeaderName, HeaderValue, Method};

use common::{server_and_client, signed_in};

// ── Fetch: load lifecycle ───────────────────────────────────────────

#[tokio::test]
async fn test_mount_loads_and_brackets_loading() {
    let (server, client) = server_and_client().await;
    Mock::given(method("GET"))
        .and(path("/api/x"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [1, 2, 3] }))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetch: FetchController<Value> = FetchController::new(client, ControllerOptions::default());
    let mut rx = fetch.subscribe();
    assert!(!rx.borrow().loading);

    let (issued, observed) = tokio::join!(fetch.set_path("/api/x"), async {
        rx.changed().await.unwrap();
        rx.borrow_and_update().loading
    });

    assert!(issued);
    assert!(observed, "loading should be visible while the call is in flight");
    assert_eq!(
        fetch.state(),
        FetchState {
            data: Some(json!({ "data": [1, 2, 3] })),
            loading: false,
            error: None,
        }
    );
}

#[tokio::test]
async fn test_failed_load_sets_error_and_clears_data() {
    let (server, client) = server_and_client().await;
    Mock::given(method("GET"))
        .and(path("/api/funnels"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetch: FetchController<Value> =
        FetchController::mount(client, "/api/funnels", ControllerOptions::default()).await;

    assert!(fetch.data().is_none());
    assert!(!fetch.loading());
    assert_eq!(fetch.error().as_deref(), Some("HTTP 500: Internal Server Error"));
}

#[tokio::test]
async fn test_same_path_is_not_reloaded() {
    let (server, client) = server_and_client().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let fetch: FetchController<Value> =
        FetchController::mount(client, "/api/orders", ControllerOptions::default()).await;

    assert!(!fetch.set_path("/api/orders").await);
    assert_eq!(fetch.path().as_deref(), Some("/api/orders"));
}

#[tokio::test]
async fn test_path_change_discards_previous_data() {
    let (server, client) = server_and_client().await;
    Mock::given(method("GET"))
        .and(path("/api/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("a")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!("b"))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetch: FetchController<Value> =
        FetchController::mount(client, "/api/a", ControllerOptions::default()).await;
    assert_eq!(fetch.data(), Some(json!("a")));

    let mut rx = fetch.subscribe();
    rx.borrow_and_update();
    let (_, during) = tokio::join!(fetch.set_path("/api/b"), async {
        rx.changed().await.unwrap();
        rx.borrow_and_update().data.clone()
    });

    assert_eq!(during, None);
    assert_eq!(fetch.data(), Some(json!("b")));
}

#[tokio::test]
async fn test_refetch_reissues_current_path() {
    let (server, client) = server_and_client().await;
    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(2)
        .mount(&server)
        .await;

    let fetch: FetchController<Value> =
        FetchController::mount(client, "/api/contacts", ControllerOptions::default()).await;
    fetch.refetch().await;

    assert!(fetch.error().is_none());
}

#[tokio::test]
async fn test_refetch_before_path_is_a_noop() {
    let (server, client) = server_and_client().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fetch: FetchController<Value> = FetchController::new(client, ControllerOptions::default());
    fetch.refetch().await;

    assert_eq!(fetch.state(), FetchState::default());
}

#[tokio::test]
async fn test_extra_headers_reach_the_backend() {
    let (server, client) = signed_in("T").await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(wiremock::matchers::header("x-tenant", "acme"))
        .and(wiremock::matchers::header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut options = ControllerOptions::default();
    options.headers.insert(
        HeaderName::from_static("x-tenant"),
        HeaderValue::from_static("acme"),
    );

    let fetch: FetchController<Value> = FetchController::mount(client, "/api/products", options).await;
    assert!(fetch.error().is_none());
}

// ── Fetch: overlapping calls ────────────────────────────────────────

async fn overlapping_loads(order: SettlementOrder) -> Option<Value> {
    let (server, client) = server_and_client().await;
    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!("slow"))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("fast")))
        .mount(&server)
        .await;

    let fetch: FetchController<Value> =
        FetchController::new(client, ControllerOptions::with_settlement(order));

    tokio::join!(fetch.set_path("/api/slow"), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        fetch.set_path("/api/fast").await;
    });

    assert!(!fetch.loading());
    fetch.data()
}

#[tokio::test]
async fn test_last_settled_result_wins_by_default() {
    assert_eq!(overlapping_loads(SettlementOrder::LastSettled).await, Some(json!("slow")));
}

#[tokio::test]
async fn test_latest_issued_discards_stale_result() {
    assert_eq!(overlapping_loads(SettlementOrder::LatestIssued).await, Some(json!("fast")));
}

// ── Mutation ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_mutation_defaults_to_post_and_reports_success() {
    let (server, client) = server_and_client().await;
    Mock::given(method("POST"))
        .and(path("/api/funnels"))
        .and(body_json(json!({ "name": "Launch" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9 })))
        .expect(1)
        .mount(&server)
        .await;

    let create: MutationController =
        MutationController::new(client, "/api/funnels", ControllerOptions::default());
    assert_eq!(create.method(), &Method::POST);

    let returned = create.mutate(&json!({ "name": "Launch" })).await;

    assert_eq!(returned, Some(json!({ "id": 9 })));
    let state = create.state();
    assert!(state.success);
    assert!(state.error.is_none());
    assert!(!state.loading);
    assert_eq!(state.data, Some(json!({ "id": 9 })));
}

#[tokio::test]
async fn test_mutation_failure_never_sets_success() {
    let (server, client) = server_and_client().await;
    Mock::given(method("PUT"))
        .and(path("/api/products/3"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    let update: MutationController = MutationController::with_method(
        client,
        "/api/products/3",
        Method::PUT,
        ControllerOptions::default(),
    );

    assert!(update.mutate(&json!({ "price": -1 })).await.is_none());
    assert!(!update.success());
    assert_eq!(update.error().as_deref(), Some("HTTP 422: Unprocessable Entity"));
}

#[tokio::test]
async fn test_new_mutation_resets_previous_outcome() {
    let (server, client) = server_and_client().await;
    Mock::given(method("POST"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(400))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/contacts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 1 }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let create: MutationController =
        MutationController::new(client, "/api/contacts", ControllerOptions::default());
    create.mutate(&json!({})).await;
    assert!(create.error().is_some());

    let mut rx = create.subscribe();
    rx.borrow_and_update();
    let body = json!({});
    let (_, during) = tokio::join!(create.mutate(&body), async {
        rx.changed().await.unwrap();
        rx.borrow_and_update().clone()
    });

    assert!(during.loading);
    assert!(during.error.is_none());
    assert!(!during.success);
    assert!(create.success());
    assert!(create.error().is_none());
}

#[tokio::test]
async fn test_mutate_empty_sends_no_body() {
    let (server, client) = server_and_client().await;
    Mock::given(method("DELETE"))
        .and(path("/api/workflows/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let delete: MutationController = MutationController::with_method(
        client,
        "/api/workflows/5",
        Method::DELETE,
        ControllerOptions::default(),
    );

    assert_eq!(delete.mutate_empty().await, Some(Value::Null));
    assert!(delete.success());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}
