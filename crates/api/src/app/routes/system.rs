use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::context::CurrentIdentity;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

pub async fn whoami(CurrentIdentity(identity): CurrentIdentity) -> impl IntoResponse {
    Json(identity.summary())
}
