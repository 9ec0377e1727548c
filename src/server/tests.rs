//! HTTP binding tests driving the router in-process.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::core::config::{MessageSettings, Settings};
    use crate::llm::{ChatService, Providers};
    use crate::rag::KnowledgeStore;
    use crate::server::router::router;
    use crate::state::AppState;
    use crate::testing::{KeywordEmbedder, ScriptedLlm};

    struct Harness {
        app: Router,
        llm: Arc<ScriptedLlm>,
    }

    async fn configured(llm: ScriptedLlm) -> Harness {
        configured_with(Settings::default(), llm).await
    }

    async fn configured_with(settings: Settings, llm: ScriptedLlm) -> Harness {
        let llm = Arc::new(llm);
        let providers = Providers {
            llm: llm.clone(),
            embedder: Arc::new(KeywordEmbedder::new()),
        };
        let chat = ChatService::build(&settings, &KnowledgeStore::portfolio(), Some(providers))
            .await
            .expect("chat service");
        let state = AppState::from_parts(settings, chat);
        Harness {
            app: router(state),
            llm,
        }
    }

    fn unconfigured() -> Router {
        let chat = ChatService::unconfigured(MessageSettings::default());
        router(AppState::from_parts(Settings::default(), chat))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn root_and_health_respond() {
        let app = unconfigured();

        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Smart Portfolio Chatbot API" }));

        for uri in ["/health", "/api/health"] {
            let (status, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "status": "healthy" }));
        }
    }

    #[tokio::test]
    async fn post_chat_returns_text_field() {
        let harness = configured(ScriptedLlm::replying(" I'm an NLP Researcher. ")).await;

        let (status, body) = send(
            &harness.app,
            post_json("/api/chat", json!({ "message": "What is your current role?" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "text": "I'm an NLP Researcher." }));
        let prompt = harness
            .llm
            .last_request()
            .and_then(|r| r.system_prompt().map(str::to_string))
            .expect("prompt");
        assert!(prompt.contains("USER QUESTION: What is your current role?"));
    }

    #[tokio::test]
    async fn get_chat_returns_response_field() {
        let harness = configured(ScriptedLlm::replying("Hello!")).await;

        let (status, body) = send(&harness.app, get("/chat?query=Tell%20me%20about%20yourself")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "Hello!" }));
    }

    #[tokio::test]
    async fn model_failure_is_still_a_200_with_apology() {
        let harness = configured(ScriptedLlm::failing("upstream 500")).await;

        let (status, body) = send(&harness.app, post_json("/api/chat", json!({ "message": "hi" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], MessageSettings::default().apology);
    }

    #[tokio::test]
    async fn unconfigured_chat_returns_config_error_text() {
        let app = unconfigured();

        let (status, body) = send(&app, post_json("/api/chat", json!({ "message": "hi" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], MessageSettings::default().config_error);

        let (status, body) = send(&app, get("/chat?query=hi")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], MessageSettings::default().config_error);
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_the_pipeline() {
        let harness = configured(ScriptedLlm::replying("unused")).await;

        let (status, body) = send(&harness.app, post_json("/api/chat", json!({ "message": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(&harness.app, get("/chat")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(harness.llm.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_bodies_get_error_json() {
        let harness = configured(ScriptedLlm::replying("unused")).await;
        let broken = Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"message\": "))
            .expect("request");

        let (status, body) = send(&harness.app, broken).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&harness.app, post_json("/api/chat", json!({ "message": 42 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&harness.app, post_json("/api/contact", json!({ "content": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(harness.llm.calls(), 0);
    }

    #[tokio::test]
    async fn overlong_query_is_rejected() {
        let settings = Settings::from_value(json!({ "app": { "max_input_length": 10 } }))
            .expect("settings");
        let harness = configured_with(settings, ScriptedLlm::replying("unused")).await;

        let (status, body) = send(
            &harness.app,
            post_json("/api/chat", json!({ "message": "this is longer than ten" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap_or_default().contains("too long"));
        assert_eq!(harness.llm.calls(), 0);
    }

    #[tokio::test]
    async fn status_reports_pipeline_state() {
        let harness = configured(ScriptedLlm::replying("x")).await;
        let (status, body) = send(&harness.app, get("/api/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["configured"], json!(true));
        assert_eq!(body["retrieval_mode"], json!("similarity"));
        assert!(body["indexed_chunks"].as_u64().unwrap_or(0) >= 11);
        assert!(body["started_at"].is_string());
        assert!(body["uptime_secs"].as_i64().is_some());

        let app = unconfigured();
        let (_, body) = send(&app, get("/api/status")).await;
        assert_eq!(body["configured"], json!(false));
        assert_eq!(body["retrieval_mode"], Value::Null);
        assert_eq!(body["indexed_chunks"], json!(0));
    }

    #[tokio::test]
    async fn contact_acknowledges_submission() {
        let app = unconfigured();

        let (status, body) = send(
            &app,
            post_json(
                "/api/contact",
                json!({ "content": "Let's collaborate!", "name": "Sam", "email": "sam@example.com" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "Thank you for your message! I'll get back to you soon." })
        );

        let (status, _) = send(&app, post_json("/api/contact", json!({ "content": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_allows_local_frontend() {
        let app = unconfigured();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );
    }
}
