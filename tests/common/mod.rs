//! In-process stand-in for the archive API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use kanahcian::api::ApiClient;
use kanahcian::config::{ApiConfig, PhotoConfig};
use kanahcian::models::Envelope;

/// Write requests seen by the fake upstream, as `(method path, body)`
pub type CallLog = Arc<Mutex<Vec<(String, Value)>>>;

/// Location ids whose records route misbehaves
pub const RECORDS_ALWAYS_REJECTED: i64 = 66;
pub const RECORDS_NOT_AN_ARRAY: i64 = 77;
pub const RECORDS_UNSUCCESSFUL: i64 = 78;

#[derive(Clone, Default)]
pub struct UpstreamOptions {
    /// Added to every `/api/records` response
    pub records_delay: Option<Duration>,
    /// Full `/api/locations` response body instead of the standard one
    pub locations_body: Option<Value>,
}

#[derive(Clone)]
struct FakeState {
    calls: CallLog,
    options: UpstreamOptions,
}

pub struct Upstream {
    pub addr: SocketAddr,
    pub calls: CallLog,
}

impl Upstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        let api = ApiConfig {
            base_url: self.base_url(),
            ..Default::default()
        };
        ApiClient::new(&api, &PhotoConfig::default()).unwrap()
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn locations() -> Value {
    json!([
        {
            "id": 1,
            "name": "加平教會",
            "latitude": 23.0012,
            "longitude": 121.1301,
            "address": "台東縣延平鄉",
            "brief_description": "<p>部落的長老教會</p>",
            "photo": "https://drive.google.com/file/d/church01/view",
            "tag": ["教會"]
        },
        {
            "id": 2,
            "name": "加樂活動中心",
            "latitude": "23.0050",
            "longitude": 121.1350,
            "tag": ["村晚, 卡拉ok"]
        },
        {
            "id": 3,
            "name": "嘉蘭農場",
            "latitude": "n/a",
            "longitude": 121.1400,
            "tag": ["農訪"]
        }
    ])
}

fn records_for(location_id: i64) -> Value {
    match location_id {
        1 => json!([
            {
                "recordid": 11,
                "semester": "111-2",
                "date": "2023-03-05",
                "description": "拜訪長老",
                "students": ["王小明"],
                "villagers": [{"villager_id": 7, "name": "江新武長老"}]
            },
            {
                "recordid": 12,
                "semester": "111-1",
                "date": "2022-11-20",
                "description": "",
                "villagers": ["Cina Valis"]
            },
            {
                "recordid": 13,
                "semester": "110-2",
                "date": null,
                "description": "忘了記日期"
            }
        ]),
        2 => json!([
            {
                "recordid": 21,
                "semester": "112-1",
                "date": "2023-10-01",
                "description": "村晚",
                "villagers": [{"villager_id": 9, "name": "Cina Valis"}]
            }
        ]),
        _ => json!([]),
    }
}

fn success(data: Value) -> Json<Value> {
    Json(serde_json::to_value(Envelope::success(data)).unwrap())
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": format!("{} not found", what)}))).into_response()
}

fn log(calls: &CallLog, call: String, body: Value) {
    calls.lock().unwrap().push((call, body));
}

async fn list_locations(State(state): State<FakeState>) -> Json<Value> {
    match &state.options.locations_body {
        Some(body) => Json(body.clone()),
        None => success(locations()),
    }
}

async fn add_location(
    State(FakeState { calls, .. }): State<FakeState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    log(&calls, "POST /api/location".into(), body.clone());
    let mut created = body;
    created["id"] = json!(100);
    success(created)
}

async fn update_location(
    State(FakeState { calls, .. }): State<FakeState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    log(&calls, format!("PUT /api/location/{}", id), body.clone());
    if id > 3 {
        return not_found("location");
    }
    let mut updated = body;
    updated["id"] = json!(id);
    success(updated).into_response()
}

async fn delete_location(
    State(FakeState { calls, .. }): State<FakeState>,
    Path(id): Path<i64>,
) -> Response {
    log(&calls, format!("DELETE /api/location/{}", id), Value::Null);
    if id > 3 {
        return not_found("location");
    }
    success(Value::Null).into_response()
}

/// Only the JSON-body form is accepted, like the deployed archive.
async fn records(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    if let Some(delay) = state.options.records_delay {
        tokio::time::sleep(delay).await;
    }
    if query.contains_key("locationid") {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body"], "msg": "field required"}]})),
        )
            .into_response();
    }
    let location_id = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v["locationid"].as_i64());
    match location_id {
        Some(RECORDS_ALWAYS_REJECTED) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "records unavailable"})),
        )
            .into_response(),
        Some(RECORDS_NOT_AN_ARRAY) => success(json!({"recordid": 1})).into_response(),
        Some(RECORDS_UNSUCCESSFUL) => Json(json!({
            "status": "error",
            "data": records_for(1),
            "message": "database offline"
        }))
        .into_response(),
        Some(id) => success(records_for(id)).into_response(),
        None => (StatusCode::BAD_REQUEST, Json(json!({"detail": "locationid required"})))
            .into_response(),
    }
}

async fn create_record(
    State(FakeState { calls, .. }): State<FakeState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    log(&calls, "POST /api/record".into(), body.clone());
    let mut created = body;
    created["recordid"] = json!(500);
    success(created)
}

async fn update_record(
    State(FakeState { calls, .. }): State<FakeState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    log(&calls, format!("PUT /api/record/{}", id), body.clone());
    let mut updated = body;
    updated["recordid"] = json!(id);
    success(updated)
}

async fn delete_record(
    State(FakeState { calls, .. }): State<FakeState>,
    Path(id): Path<i64>,
) -> Json<Value> {
    log(&calls, format!("DELETE /api/record/{}", id), Value::Null);
    success(Value::Null)
}

async fn villager(Path(id): Path<i64>) -> Response {
    match id {
        7 => success(json!({
            "villagerid": 7,
            "name": "江新武長老",
            "gender": "M",
            "job": "牧師",
            "url": null,
            "photo": "https://drive.google.com/file/d/elder07/view?usp=sharing",
            "locationid": 1
        }))
        .into_response(),
        9 => success(json!({
            "villagerid": 9,
            "name": "Cina Valis",
            "gender": "F",
            "job": "",
            "locationid": 2
        }))
        .into_response(),
        _ => not_found("villager"),
    }
}

/// Start the fake archive on an ephemeral port.
pub async fn spawn_upstream() -> Upstream {
    spawn_upstream_with(UpstreamOptions::default()).await
}

pub async fn spawn_upstream_with(options: UpstreamOptions) -> Upstream {
    let calls: CallLog = Arc::default();
    let state = FakeState {
        calls: calls.clone(),
        options,
    };

    let app = Router::new()
        .route("/api/locations", get(list_locations))
        .route("/api/location", post(add_location))
        .route(
            "/api/location/{id}",
            put(update_location).delete(delete_location),
        )
        .route("/api/records", post(records))
        .route("/api/record", post(create_record))
        .route("/api/record/{id}", put(update_record).delete(delete_record))
        .route("/api/villager/{id}", get(villager))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream { addr, calls }
}
