use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub content: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// `POST /api/contact`. Submissions are logged, not stored.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(form) = payload?;
    let content = form.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest(
            "Message content must not be empty".to_string(),
        ));
    }

    tracing::info!("Contact form submission: {}", submission_summary(&form, content));
    tracing::debug!(
        email = form.email.as_deref().unwrap_or("-"),
        "Contact form content: {}",
        content
    );

    Ok(Json(json!({ "message": state.settings.messages.contact_ack })))
}

/// Sender name and size only; address and body stay out of the persistent log.
fn submission_summary(form: &ContactForm, content: &str) -> String {
    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("anonymous");
    format!("from {} ({} chars)", name, content.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_omits_email_and_message_body() {
        let form = ContactForm {
            content: "Call me at 555-0100".to_string(),
            name: Some("Sam".to_string()),
            email: Some("sam@example.com".to_string()),
        };
        let summary = submission_summary(&form, form.content.trim());

        assert_eq!(summary, "from Sam (19 chars)");
        assert!(!summary.contains("example.com"));
        assert!(!summary.contains("555"));
    }

    #[test]
    fn summary_defaults_blank_name_to_anonymous() {
        let form = ContactForm {
            content: "hi".to_string(),
            name: Some("  ".to_string()),
            email: None,
        };
        assert_eq!(submission_summary(&form, "hi"), "from anonymous (2 chars)");
    }
}
