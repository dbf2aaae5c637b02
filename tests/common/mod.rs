use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use servehub::config::{ApiConfig, AppConfig, Config};
use servehub::services::storage::{MemoryStore, SharedStore};
use servehub::ServeHub;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

#[derive(Default)]
pub struct Backend {
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Backend {
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }
}

pub fn service_json(id: &str, title: &str, price: f64, rating: f64) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": "Fully insured",
        "category": "Cleaning",
        "price": price,
        "photos": [],
        "location": { "address": "1 High St" },
        "rating": rating,
        "reviewCount": 3,
        "provider": { "_id": "p1", "name": "Sam", "email": "sam@example.com" }
    })
}

fn message_json(id: &str) -> Value {
    json!({
        "_id": id,
        "sender": { "_id": "u2", "name": "Bob", "email": "bob@example.com" },
        "receiver": { "_id": "u1", "name": "Jane", "email": "jane@example.com" },
        "content": "See you tomorrow",
        "read": false,
        "createdAt": "2024-06-15T09:30:00.000Z"
    })
}

async fn handle(req: HttpRequest, body: web::Bytes, backend: web::Data<Backend>) -> HttpResponse {
    let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    let recorded = RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: body.to_vec(),
    };
    backend.requests.lock().unwrap().push(recorded.clone());

    let authorized = recorded.authorization.as_deref() == Some("Bearer tok-123");
    let unauthorized = || HttpResponse::Unauthorized().json(json!({ "message": "Not authorized" }));

    match (recorded.method.as_str(), recorded.path.as_str()) {
        ("POST", "/api/auth/login") => {
            let body = recorded.json();
            if body["email"] == "jane@example.com" && body["password"] == "secret" {
                HttpResponse::Ok().json(json!({
                    "token": "tok-123",
                    "user": { "id": "u1", "name": "Jane", "email": "jane@example.com", "role": "client" }
                }))
            } else {
                HttpResponse::Unauthorized().json(json!({ "message": "Invalid credentials" }))
            }
        }
        ("POST", "/api/auth/register") => HttpResponse::Created().json(json!({
            "token": "tok-123",
            "user": { "id": "u9", "name": recorded.json()["name"], "email": recorded.json()["email"], "role": "provider" }
        })),
        ("GET", "/api/services") => HttpResponse::Ok().json(json!({
            "data": [
                service_json("s1", "Window cleaning", 30.0, 4.1),
                service_json("s2", "Carpet cleaning", 80.0, 4.9),
                service_json("s3", "Oven cleaning", 55.0, 3.8)
            ]
        })),
        ("GET", "/api/services/s1") => HttpResponse::Ok().json(json!({ "data": service_json("s1", "Window cleaning", 30.0, 4.1) })),
        ("POST", "/api/services") if authorized => HttpResponse::Created().json(json!({ "_id": "s9" })),
        ("GET", "/api/bookings") if authorized => HttpResponse::Ok().json(json!([])),
        ("POST", "/api/bookings") if authorized => {
            if recorded.json()["service"] == "busy" {
                HttpResponse::Conflict().json(json!({ "message": "Provider unavailable on that date" }))
            } else {
                HttpResponse::Created().json(json!({ "_id": "b1", "status": "pending" }))
            }
        }
        ("PUT", path) if path.starts_with("/api/bookings/") && authorized => HttpResponse::Ok().json(json!({ "_id": "b1" })),
        ("GET", "/api/messages/u2") if authorized => HttpResponse::Ok().json(json!([message_json("m1"), message_json("m2")])),
        ("POST", "/api/messages") if authorized => HttpResponse::Created().json(json!({ "_id": "m3" })),
        ("GET", "/api/reviews/s1") => HttpResponse::Ok().json(json!([])),
        ("POST", "/api/reviews") if authorized => HttpResponse::Created().json(json!({ "_id": "r1" })),
        ("POST", "/api/users/push-token") if authorized => HttpResponse::Ok().json(json!({ "success": true })),
        ("PUT", "/api/users/u1") if authorized => {
            let multipart = recorded
                .content_type
                .as_deref()
                .map_or(false, |ct| ct.starts_with("multipart/form-data"));
            if multipart {
                HttpResponse::Ok().json(json!({ "profilePic": "https://cdn.example.com/u1.png" }))
            } else {
                let body = recorded.json();
                HttpResponse::Ok().json(json!({
                    "_id": "u1",
                    "name": body["name"],
                    "email": "jane@example.com",
                    "phone": body["phone"],
                    "bio": body["bio"],
                    "location": body["location"]
                }))
            }
        }
        ("GET", "/api/broken") => HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR).body("upstream exploded"),
        (_, path) if path.starts_with("/api/") && !authorized => unauthorized(),
        _ => HttpResponse::NotFound().json(json!({ "message": "Route not found" })),
    }
}

/// Starts the stand-in backend and returns its `/api` base URL.
pub fn start_backend() -> (String, web::Data<Backend>) {
    let backend = web::Data::new(Backend::default());
    let data = backend.clone();

    let server = HttpServer::new(move || App::new().app_data(data.clone()).default_service(web::to(handle)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    (format!("http://{}/api", addr), backend)
}

pub fn config(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
        },
        storage_url: "memory://".to_string(),
        app: AppConfig {
            message_poll_interval_secs: 1,
        },
    }
}

pub async fn hub(base_url: &str) -> (ServeHub, SharedStore) {
    let store: SharedStore = Arc::new(MemoryStore::default());
    let hub = ServeHub::with_store(config(base_url), store.clone()).await;
    (hub, store)
}

pub async fn signed_in_hub(base_url: &str) -> (ServeHub, SharedStore) {
    let (hub, store) = hub(base_url).await;
    hub.auth.login("jane@example.com", "secret").await.unwrap();
    (hub, store)
}
