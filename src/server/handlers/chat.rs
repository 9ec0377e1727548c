use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatParams {
    #[serde(default)]
    pub query: String,
}

/// `POST /api/chat`
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let query = validate_query(&body.message, state.settings.app.max_input_length)?;
    let text = state.chat.respond(query).await;
    Ok(Json(json!({ "text": text })))
}

/// `GET /chat?query=...`
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ChatParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let query = validate_query(&params.query, state.settings.app.max_input_length)?;
    let response = state.chat.respond(query).await;
    Ok(Json(json!({ "response": response })))
}

fn validate_query(raw: &str, max_chars: usize) -> Result<&str, ApiError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query must not be empty".to_string()));
    }
    let len = query.chars().count();
    if len > max_chars {
        return Err(ApiError::BadRequest(format!(
            "Query is too long ({} characters, limit {})",
            len, max_chars
        )));
    }
    Ok(query)
}
