use axum::Json;
use serde_json::{json, Value};

use crate::models::new_estate_id;

/// Hand out an identifier from the same generator the pipeline uses
pub async fn new_id() -> Json<Value> {
    Json(json!({ "message": new_estate_id().to_string() }))
}
