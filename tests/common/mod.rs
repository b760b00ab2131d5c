#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: &'static str,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct Upstream {
    pub tanks: Vec<Value>,
    pub requests: Vec<Recorded>,
    pub fail_list: bool,
    pub reject_creates: bool,
    next_id: u64,
}

/// In-process stand-in for the tank REST API, bound to a random local port.
#[derive(Clone)]
pub struct FakeUpstream {
    pub base_url: String,
    pub data: Arc<Mutex<Upstream>>,
}

impl FakeUpstream {
    pub async fn start(tanks: Vec<Value>) -> Self {
        let data = Arc::new(Mutex::new(Upstream {
            tanks,
            ..Upstream::default()
        }));
        let app = Router::new()
            .route("/api/tanks", get(list_tanks).post(create_tank))
            .route("/api/tank-params", post(create_parameter))
            .route("/api/water-changes", post(create_water_change))
            .with_state(data.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            data,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.data.lock().unwrap().fail_list = fail;
    }

    pub fn set_reject_creates(&self, reject: bool) {
        self.data.lock().unwrap().reject_creates = reject;
    }
}

pub fn tank_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "species": "Guppy",
        "volumeGallons": 20,
        "notes": "",
        "parameters": [],
        "waterChanges": [],
        "feedings": []
    })
}

fn record(
    data: &mut Upstream,
    method: &'static str,
    path: &'static str,
    headers: &HeaderMap,
    body: Value,
) {
    data.requests.push(Recorded {
        method,
        path,
        authorization: headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    });
}

async fn list_tanks(
    State(data): State<Arc<Mutex<Upstream>>>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut data = data.lock().unwrap();
    record(&mut data, "GET", "/api/tanks", &headers, Value::Null);
    if data.fail_list {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "database down".into()));
    }
    Ok(Json(Value::Array(data.tanks.clone())))
}

async fn create_tank(
    State(data): State<Arc<Mutex<Upstream>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut data = data.lock().unwrap();
    record(&mut data, "POST", "/api/tanks", &headers, body.clone());
    if data.reject_creates {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "tank rejected".into()));
    }
    data.next_id += 1;
    let mut tank = body;
    tank["id"] = json!(format!("tank-{}", data.next_id));
    data.tanks.push(tank.clone());
    Ok(Json(tank))
}

async fn create_parameter(
    State(data): State<Arc<Mutex<Upstream>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut data = data.lock().unwrap();
    record(&mut data, "POST", "/api/tank-params", &headers, body.clone());
    if data.reject_creates {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "parameter rejected".into()));
    }
    data.next_id += 1;
    let mut parameter = body.clone();
    parameter["id"] = json!(format!("param-{}", data.next_id));
    push_nested(&mut data, &body, "parameters", parameter.clone())?;
    Ok(Json(parameter))
}

async fn create_water_change(
    State(data): State<Arc<Mutex<Upstream>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut data = data.lock().unwrap();
    record(&mut data, "POST", "/api/water-changes", &headers, body.clone());
    if data.reject_creates {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "water change rejected".into()));
    }
    data.next_id += 1;
    let mut change = body.clone();
    change["id"] = json!(format!("change-{}", data.next_id));
    push_nested(&mut data, &body, "waterChanges", change.clone())?;
    Ok(Json(change))
}

fn push_nested(
    data: &mut Upstream,
    body: &Value,
    collection: &str,
    entry: Value,
) -> Result<(), (StatusCode, String)> {
    let tank_id = body["tankId"].as_str().unwrap_or_default();
    let tank = data
        .tanks
        .iter_mut()
        .find(|tank| tank["id"] == tank_id)
        .ok_or((StatusCode::NOT_FOUND, format!("no tank {tank_id}")))?;
    if !tank[collection].is_array() {
        tank[collection] = json!([]);
    }
    if let Some(records) = tank[collection].as_array_mut() {
        records.push(entry);
    }
    Ok(())
}
