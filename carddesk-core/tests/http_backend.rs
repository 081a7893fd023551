//! Exercises the reqwest-backed client against a throwaway axum backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use carddesk_core::dispatch::DispatchSubmitter;
use carddesk_core::error::{ApiError, DispatchError};
use carddesk_core::infra::{ApiClient, BackendApi, HttpBackend};
use carddesk_core::reports::ReportService;
use carddesk_core::{ScanBatch, directory::MessengerDirectory};
use carddesk_model::{
    CreateDispatchRequest, CreateMessengerRequest, DispatchFilter, MessengerId,
    ReportDate,
};
use serde_json::{Value, json};

const CREATED_AT: &str = "2024-03-09T10:15:00+00:00";

#[derive(Clone, Default)]
struct Recorded {
    dispatches: Arc<Mutex<Vec<CreateDispatchRequest>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

fn messenger_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "contact_number": "555-0100",
        "created_at": CREATED_AT,
    })
}

async fn list_messengers() -> Json<Value> {
    Json(json!([messenger_json("m1", "Ana"), messenger_json("m2", "Bea")]))
}

async fn get_messenger(
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if id == "m1" {
        Ok(Json(messenger_json("m1", "Ana")))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Messenger not found"})),
        ))
    }
}

async fn create_messenger(
    Json(req): Json<CreateMessengerRequest>,
) -> Json<Value> {
    Json(messenger_json("m3", &req.name))
}

async fn delete_messenger(Path(_id): Path<String>) -> Json<Value> {
    Json(json!({"message": "Messenger deleted successfully"}))
}

async fn create_dispatch(
    State(recorded): State<Recorded>,
    Json(req): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let req: CreateDispatchRequest = serde_json::from_value(req)
        .map_err(|err| (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))?;
    if req.messenger_id.as_str() == "down" {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "database unavailable".into(),
        ));
    }
    let body = json!({
        "id": "d-1",
        "messenger_id": req.messenger_id,
        "messenger_name": "Ana",
        "items": req.items,
        "total_cards": req.items.len(),
        "created_at": CREATED_AT,
        "date": "2024-03-09",
    });
    recorded.dispatches.lock().unwrap().push(req);
    Ok(Json(body))
}

async fn today() -> Json<Value> {
    Json(json!([{
        "id": "d-1",
        "messenger_id": "m1",
        "messenger_name": "Ana",
        "items": [{"card_number": "1", "client_number": "C1"}],
        "total_cards": 1,
        "created_at": CREATED_AT,
        "date": "2024-03-09",
    }]))
}

async fn list_dispatches(
    State(recorded): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    recorded.queries.lock().unwrap().push(query);
    Json(json!([]))
}

async fn daily_report(
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let date = query.get("date").cloned().unwrap_or_default();
    Json(json!({
        "date": date,
        "total_cards": 3,
        "total_dispatches": 2,
        "total_messengers": 1,
        "messengers": {
            "m1": {
                "messenger_name": "Ana",
                "messenger_contact": "555-0100",
                "total_cards": 3,
                "dispatches": [
                    {"id": "d-1", "time": CREATED_AT, "cards": 1, "items": []},
                    {"id": "d-2", "time": CREATED_AT, "cards": 2, "items": []}
                ]
            }
        }
    }))
}

async fn export_excel() -> Vec<u8> {
    b"PK\x03\x04fake-xlsx".to_vec()
}

async fn spawn_backend(recorded: Recorded) -> String {
    let app = Router::new()
        .route("/api/messengers", get(list_messengers).post(create_messenger))
        .route(
            "/api/messengers/{id}",
            get(get_messenger).delete(delete_messenger),
        )
        .route("/api/dispatches", get(list_dispatches).post(create_dispatch))
        .route("/api/dispatches/today", get(today))
        .route("/api/reports/daily", get(daily_report))
        .route("/api/reports/export-excel", get(export_excel))
        .with_state(recorded);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    // Operators often paste the URL with the `/api` suffix.
    format!("{addr}/api")
}

async fn backend(recorded: Recorded) -> Arc<dyn BackendApi> {
    let base = spawn_backend(recorded).await;
    let client = ApiClient::new(&base, Duration::from_secs(5)).unwrap();
    Arc::new(HttpBackend::new(Arc::new(client)))
}

fn id(raw: &str) -> MessengerId {
    MessengerId::new(raw).unwrap()
}

#[tokio::test]
async fn messenger_crud_round_trip() {
    let api = backend(Recorded::default()).await;
    let directory = MessengerDirectory::new(api.clone());

    let listed = directory.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Ana");

    assert_eq!(directory.get(&id("m1")).await.unwrap().name, "Ana");

    let added = directory.add("Cleo", "555-0199").await.unwrap();
    assert_eq!(added.id, id("m3"));

    directory.remove(&id("m3")).await.unwrap();
}

#[tokio::test]
async fn unknown_messenger_maps_to_status_error() {
    let api = backend(Recorded::default()).await;
    let err = api.get_messenger(&id("nope")).await.unwrap_err();
    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            assert!(body.contains("Messenger not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn dispatch_submission_sends_courier_and_items() {
    let recorded = Recorded::default();
    let api = backend(recorded.clone()).await;
    let submitter = DispatchSubmitter::new(api);

    let mut batch = ScanBatch::new();
    batch.submit_code("1234-5678", "Ana").unwrap();
    batch.submit_code("8765-4321", "Bea").unwrap();

    let confirmation = submitter.submit(Some(&id("m1")), &batch).await.unwrap();
    assert_eq!(confirmation.dispatch_id.as_str(), "d-1");
    assert_eq!(confirmation.item_count, 2);

    let sent = recorded.dispatches.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].messenger_id, id("m1"));
    let cards: Vec<_> =
        sent[0].items.iter().map(|i| i.card_number.as_str()).collect();
    assert_eq!(cards, ["1234-5678", "8765-4321"]);
}

#[tokio::test]
async fn backend_failure_surfaces_as_submission_error() {
    let api = backend(Recorded::default()).await;
    let submitter = DispatchSubmitter::new(api);

    let mut batch = ScanBatch::new();
    batch.submit_code("1", "a").unwrap();

    let err = submitter.submit(Some(&id("down")), &batch).await.unwrap_err();
    match err {
        DispatchError::Submission(api_err) => assert_eq!(
            api_err.status(),
            Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
        ),
        other => panic!("expected submission error, got {other:?}"),
    }
    assert_eq!(batch.len(), 1);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        ApiClient::new(&addr.to_string(), Duration::from_secs(2)).unwrap();
    let api = HttpBackend::new(Arc::new(client));
    let err = api.list_messengers().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn reports_and_listing_use_query_parameters() {
    let recorded = Recorded::default();
    let api = backend(recorded.clone()).await;
    let reports = ReportService::new(api);
    let date: ReportDate = "2024-03-09".parse().unwrap();

    let today = reports.today().await.unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].total_cards, 1);

    let report = reports.daily(Some(date)).await.unwrap();
    assert_eq!(report.date, Some(date));
    assert_eq!(report.total_cards, 3);
    assert_eq!(report.messengers[&id("m1")].dispatches.len(), 2);

    reports
        .dispatches(DispatchFilter::on(date).for_messenger(id("m1")))
        .await
        .unwrap();
    let queries = recorded.queries.lock().unwrap().clone();
    assert_eq!(
        queries[0].get("date").map(String::as_str),
        Some("2024-03-09")
    );
    assert_eq!(
        queries[0].get("messenger_id").map(String::as_str),
        Some("m1")
    );

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.xlsx");
    let written = reports.export_excel(Some(date), &out).await.unwrap();
    assert_eq!(written, std::fs::read(&out).unwrap().len());
}
