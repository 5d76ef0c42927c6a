//! HttpClient against an in-process stub of the biofeedback API

use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use biofeedback::auth::{AuthGate, INCORRECT_PASSWORD};
use biofeedback::session::{Dashboard, FetchOutcome, SubmitOutcome, SUBMIT_SUCCESS_MESSAGE};
use biofeedback::{BiofeedbackApi, ChartData, ClientError, DateRange, HttpClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TOKEN: &str = "tok-1";

#[derive(Default)]
struct Stub {
    rows: Vec<Value>,
    queries: Vec<HashMap<String, String>>,
    require_token: bool,
    fail_with: Option<StatusCode>,
    garbage_body: bool,
}

type Shared = Arc<Mutex<Stub>>;

async fn list_entries(
    State(stub): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut stub = stub.lock().unwrap();
    stub.queries.push(params.clone());

    if let Some(status) = stub.fail_with {
        return (status, "database unavailable").into_response();
    }
    if stub.garbage_body {
        return "<html>oops</html>".into_response();
    }

    let in_range = |row: &Value| {
        let date = row["date"].as_str().unwrap_or_default();
        params.get("start_date").map_or(true, |s| date >= s.as_str())
            && params.get("end_date").map_or(true, |e| date <= e.as_str())
    };

    // Newest first, like the real backend
    let mut rows: Vec<Value> = stub.rows.iter().filter(|r| in_range(*r)).cloned().collect();
    rows.sort_by(|a, b| b["date"].as_str().cmp(&a["date"].as_str()));
    Json(Value::Array(rows)).into_response()
}

async fn create_entry(
    State(stub): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut stub = stub.lock().unwrap();

    if stub.require_token {
        let expected = format!("Bearer {}", TOKEN);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if auth != expected {
            return (StatusCode::UNAUTHORIZED, "Could not validate credentials").into_response();
        }
    }

    if body.get("date").is_none() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "date is required").into_response();
    }

    // Store the flat row shape the backend returns
    let id = stub.rows.len() as i64 + 1;
    let mut row = json!({ "id": id, "date": body["date"], "summary": body["summary"] });
    if let Some(metrics) = body["metrics"].as_object() {
        for (name, value) in metrics {
            row[name] = value["score"].clone();
        }
    }
    stub.rows.push(row);

    Json(json!({ "id": id, "message": "Biofeedback data saved successfully" })).into_response()
}

async fn issue_token(Form(form): Form<HashMap<String, String>>) -> Response {
    let ok = form.get("username").map(String::as_str) == Some("yash")
        && form.get("password").map(String::as_str) == Some("pw");

    if ok {
        Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "Incorrect username or password").into_response()
    }
}

async fn spawn_stub(stub: Stub) -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(stub));

    let app = Router::new()
        .route("/biofeedback", get(list_entries).post(create_entry))
        .route("/token", post(issue_token))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/", addr), shared)
}

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(base_url, Duration::from_secs(5)).unwrap()
}

fn seeded_rows() -> Vec<Value> {
    vec![
        json!({ "id": 1, "date": "2024-01-01", "mood": 3, "energy_levels": 4, "soreness": null }),
        json!({ "id": 2, "date": "2024-01-02", "mood": 5, "energy_levels": null }),
        json!({ "id": 3, "date": "2024-02-01", "mood": 1 }),
    ]
}

#[tokio::test]
async fn test_fetch_sends_range_and_decodes_rows() {
    let (url, stub) = spawn_stub(Stub {
        rows: seeded_rows(),
        ..Default::default()
    })
    .await;

    let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
    let entries = client(&url).fetch_entries(&range).await.unwrap();

    let query = stub.lock().unwrap().queries[0].clone();
    assert_eq!(query.get("start_date").map(String::as_str), Some("2024-01-01"));
    assert_eq!(query.get("end_date").map(String::as_str), Some("2024-01-31"));

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, Some(2));
    assert!(!entries[1].metrics.contains_key("soreness"));

    let chart = ChartData::with_metrics(&entries, vec!["energy_levels".into(), "mood".into()]);
    let energy = chart.series_for("energy_levels").unwrap();
    assert_eq!(energy.points.len(), 1);
    assert_eq!(energy.points[0].value, 4.0);
    let mood: Vec<f64> = chart.series_for("mood").unwrap().points.iter().map(|p| p.value).collect();
    assert_eq!(mood, vec![3.0, 5.0]);
}

#[tokio::test]
async fn test_unbounded_fetch_sends_no_params() {
    let (url, stub) = spawn_stub(Stub {
        rows: seeded_rows(),
        ..Default::default()
    })
    .await;

    let entries = client(&url).fetch_entries(&DateRange::all()).await.unwrap();

    assert_eq!(entries.len(), 3);
    assert!(stub.lock().unwrap().queries[0].is_empty());
}

#[tokio::test]
async fn test_error_status_and_garbage_body() {
    let (url, _) = spawn_stub(Stub {
        fail_with: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Default::default()
    })
    .await;

    match client(&url).fetch_entries(&DateRange::all()).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let (url, _) = spawn_stub(Stub {
        garbage_body: true,
        ..Default::default()
    })
    .await;

    assert!(matches!(
        client(&url).fetch_entries(&DateRange::all()).await,
        Err(ClientError::Decode(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client(&format!("http://{}", addr))
        .fetch_entries(&DateRange::all())
        .await;
    assert!(matches!(result, Err(ClientError::Transport(_))));
}

#[tokio::test]
async fn test_submit_then_single_refetch() {
    let (url, stub) = spawn_stub(Stub::default()).await;

    let mut dashboard = Dashboard::new(client(&url));
    dashboard.session_mut().set_input(
        r#"{"date": "2024-03-01", "metrics": {"mood": {"score": 4, "notes": "calm"}}, "summary": "ok"}"#,
    );

    let outcome = dashboard.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Submitted {
            refetch: FetchOutcome::Applied { count: 1 }
        }
    );
    assert_eq!(stub.lock().unwrap().queries.len(), 1);
    assert_eq!(dashboard.session().input(), "");
    assert_eq!(
        dashboard.session().notice().map(|n| n.text()),
        Some(SUBMIT_SUCCESS_MESSAGE)
    );
    assert_eq!(dashboard.session().entries()[0].metric_score("mood"), Some(4.0));
}

#[tokio::test]
async fn test_rejected_submit_keeps_input() {
    let (url, stub) = spawn_stub(Stub::default()).await;

    let mut dashboard = Dashboard::new(client(&url));
    dashboard.session_mut().set_input(r#"{"metrics": {}}"#);

    assert_eq!(dashboard.submit().await, SubmitOutcome::Failed);
    assert_eq!(dashboard.session().input(), r#"{"metrics": {}}"#);
    assert!(stub.lock().unwrap().queries.is_empty());
}

#[tokio::test]
async fn test_token_login_attaches_bearer() {
    let (url, stub) = spawn_stub(Stub {
        require_token: true,
        ..Default::default()
    })
    .await;

    let mut http = client(&url);
    let entry = json!({ "date": "2024-03-01", "metrics": { "mood": 2 } });

    assert_eq!(
        http.submit_entry(&entry).await,
        Err(ClientError::Unauthorized)
    );

    let mut gate = AuthGate::new();
    assert!(!gate.login(&http, "yash", "wrong").await);
    assert_eq!(gate.message(), Some(INCORRECT_PASSWORD));

    assert!(gate.login(&http, "yash", "pw").await);
    assert_eq!(gate.token(), Some(TOKEN));

    http.set_token(gate.token().map(str::to_string));
    http.submit_entry(&entry).await.unwrap();
    assert_eq!(stub.lock().unwrap().rows.len(), 1);
}
