pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod drafts;

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
