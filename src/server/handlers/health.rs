use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Smart Portfolio Chatbot API" }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0);
    Json(json!({
        "configured": state.chat.is_configured(),
        "retrieval_mode": state.chat.retrieval_mode().map(|mode| mode.as_str()),
        "indexed_chunks": state.chat.indexed_chunks(),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime
    }))
}
