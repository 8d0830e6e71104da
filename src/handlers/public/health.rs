use axum::response::Json;
use serde_json::{json, Value};

use crate::config;

/// GET / - service identity and endpoint map
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Grocery API",
        "version": version,
        "endpoints": {
            "login": "POST /login (public - token acquisition)",
            "health": "GET /health (public)",
            "grocery": "GET|POST /grocery, GET|DELETE /grocery/:id (bearer token required, then throttled)",
        }
    }))
}

/// GET /health - liveness
pub async fn health() -> Json<Value> {
    let mut body = json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    });

    if let Some(config) = config::get() {
        body["environment"] = json!(config.environment);
    }

    Json(body)
}
