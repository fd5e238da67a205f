#![allow(dead_code)]

//! In-memory stand-in for the hosted data service, plus helpers shared by
//! the integration tests. Speaks the verb-prefixed CRUD surface with the
//! filter/sort/limit query parameters the real service supports.

use actix_web::web::{self, Data};
use actix_web::{App, HttpRequest, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use murmur::cache::Clock;
use murmur::config::GatewayConfig;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct RecordedRequest {
    pub path: String,
    pub headers: HashMap<String, String>,
}

#[derive(Default)]
pub struct StubState {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: Mutex<i64>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubState {
    /// Seeds a row, assigning an id and a created_at that sorts with
    /// insertion order.
    pub fn insert(&self, table: &str, mut row: Value) -> i64 {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = *next_id;
        row["id"] = json!(id);
        if row.get("created_at").is_none() {
            row["created_at"] = json!(format!("2026-08-07 10:{:02}:{:02}", id / 60, id % 60));
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_owned())
            .or_default()
            .push(row);
        id
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests whose path starts with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .count()
    }

    pub fn last_request_headers(&self) -> HashMap<String, String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.headers.clone())
            .unwrap_or_default()
    }

    fn record(&self, req: &HttpRequest) {
        let headers = req
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    value.to_str().unwrap_or_default().to_owned(),
                )
            })
            .collect();
        self.requests.lock().unwrap().push(RecordedRequest {
            path: req.uri().path().to_owned(),
            headers,
        });
    }
}

pub fn start_stub() -> (actix_test::TestServer, Arc<StubState>) {
    let state = Arc::new(StubState::default());
    let data = Data::from(state.clone());
    let srv = actix_test::start(move || {
        App::new()
            .app_data(data.clone())
            .route("/read/{resource}", web::get().to(read_rows))
            .route("/create/{resource}", web::post().to(create_row))
            .route("/update/{resource}/{id}", web::put().to(update_row))
            .route("/delete/{resource}/{id}", web::delete().to(delete_row))
            .route("/ip", web::get().to(ip_echo))
    });
    (srv, state)
}

/// Gateway instance wired to a stub upstream.
pub fn start_gateway(upstream_url: String, api_key: Option<&str>) -> actix_test::TestServer {
    let config = GatewayConfig {
        upstream_url,
        api_key: api_key.map(str::to_owned),
        instance: "test_instance".to_owned(),
        bind_addr: String::new(),
    };
    actix_test::start(move || {
        App::new()
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(awc::Client::default()))
            .configure(murmur::web::configure)
    })
}

/// Manually advanced clock shared by a widget's cache and throttle.
pub struct FakeClock(Mutex<DateTime<Utc>>);

impl FakeClock {
    pub fn new() -> Arc<Self> {
        Arc::new(FakeClock(Mutex::new(Utc::now())))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

const RESERVED_PARAMS: [&str; 5] = ["Instance", "sort", "order", "limit", "includeTotal"];

async fn read_rows(
    req: HttpRequest,
    state: Data<StubState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    state.record(&req);

    let mut rows = state.rows(&path);
    for (key, needle) in query.iter() {
        if RESERVED_PARAMS.contains(&key.as_str()) {
            continue;
        }
        if let Some(field) = key.strip_suffix("[in]") {
            rows.retain(|row| needle.split(',').any(|n| value_matches(&row[field], n)));
        } else {
            rows.retain(|row| value_matches(&row[key.as_str()], needle));
        }
    }

    if let Some(field) = query.get("sort") {
        rows.sort_by(|a, b| field_cmp(&a[field.as_str()], &b[field.as_str()]));
        if query.get("order").map(String::as_str) == Some("desc") {
            rows.reverse();
        }
    }

    let total = rows.len();
    if let Some(limit) = query.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        rows.truncate(limit);
    }

    // Extra headers let the gateway tests check the relay allow-list.
    HttpResponse::Ok()
        .insert_header(("cache-control", "max-age=60"))
        .insert_header(("x-upstream-secret", "letmein"))
        .json(json!({ "data": rows, "total": total }))
}

async fn create_row(
    req: HttpRequest,
    state: Data<StubState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    state.record(&req);
    let id = state.insert(&path, body.into_inner());
    HttpResponse::Ok().json(json!({ "id": id, "status": "success" }))
}

async fn update_row(
    req: HttpRequest,
    state: Data<StubState>,
    path: web::Path<(String, i64)>,
    body: web::Json<Value>,
) -> HttpResponse {
    state.record(&req);
    let (resource, id) = path.into_inner();

    let mut tables = state.tables.lock().unwrap();
    let rows = tables.entry(resource).or_default();
    let row = rows.iter_mut().find(|r| r["id"] == json!(id));
    match (row, body.into_inner()) {
        (Some(row), Value::Object(fields)) => {
            for (key, value) in fields {
                row[key.as_str()] = value;
            }
            HttpResponse::Ok().json(json!({ "status": "success" }))
        }
        (Some(_), _) => HttpResponse::BadRequest().json(json!({ "error": "expected an object" })),
        (None, _) => HttpResponse::NotFound().json(json!({ "error": "record not found" })),
    }
}

async fn delete_row(
    req: HttpRequest,
    state: Data<StubState>,
    path: web::Path<(String, i64)>,
) -> HttpResponse {
    state.record(&req);
    let (resource, id) = path.into_inner();

    let mut tables = state.tables.lock().unwrap();
    let rows = tables.entry(resource).or_default();
    let before = rows.len();
    rows.retain(|r| r["id"] != json!(id));
    if rows.len() < before {
        HttpResponse::Ok().json(json!({ "status": "success" }))
    } else {
        HttpResponse::NotFound().json(json!({ "error": "record not found" }))
    }
}

async fn ip_echo(req: HttpRequest, state: Data<StubState>) -> HttpResponse {
    state.record(&req);
    HttpResponse::Ok().json(json!({ "ip": "203.0.113.9" }))
}

fn value_matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s == needle,
        Value::Number(n) => n.to_string() == needle,
        Value::Bool(b) => needle == if *b { "1" } else { "0" } || needle == b.to_string(),
        _ => false,
    }
}

fn field_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
