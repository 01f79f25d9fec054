use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))

        // Translation relay
        .route("/api/translate", post(handlers::translate))
        .route("/api/languages", get(handlers::list_languages))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::upstream::{GenerativeModel, UpstreamError};

    /// Records prompts; replies with a fixed text or fails
    #[derive(Default)]
    pub(crate) struct ScriptedModel {
        pub prompts: Mutex<Vec<String>>,
        pub reply: Option<String>,
    }

    impl ScriptedModel {
        pub fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                reply: Some(text.to_string()),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().ok_or_else(|| UpstreamError::Status {
                status: 403,
                body: "API key AIza-secret-detail revoked".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    pub(crate) fn app(model: Arc<ScriptedModel>) -> Router {
        create_routes().with_state(AppState::with_model(Config::default(), model))
    }

    async fn post_json(app: Router, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/translate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn forwards_prompt_and_returns_translation_verbatim() {
        let model = ScriptedModel::replying("Bonjour le monde");
        let body = json!({"text": "Hello world", "from": "en", "to": "fr"}).to_string();

        let (status, json) = post_json(app(model.clone()), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"translation": "Bonjour le monde"}));
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Hello world"));
        assert!(prompts[0].contains("from en to fr"));
    }

    #[tokio::test]
    async fn non_string_text_is_rejected_without_upstream_call() {
        let model = ScriptedModel::replying("unused");
        let body = json!({"text": 123, "from": "en", "to": "fr"}).to_string();

        let (status, json) = post_json(app(model.clone()), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"error": "Invalid input text."}));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn missing_text_and_bad_json_are_invalid_input() {
        let model = ScriptedModel::replying("unused");

        let (status, _) = post_json(app(model.clone()), json!({"from": "en"}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = post_json(app(model.clone()), "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid input text.");

        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_returns_generic_message() {
        let model = ScriptedModel::failing();
        let body = json!({"text": "Hello", "from": "en", "to": "de"}).to_string();

        let (status, json) = post_json(app(model.clone()), body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"error": "Failed to translate text."}));
        assert!(!json.to_string().contains("secret"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn languages_pass_through_unchecked() {
        let model = ScriptedModel::replying("ok");
        let body = json!({"text": "Hi", "from": "klingon", "to": "pt-BR"}).to_string();

        let (status, _) = post_json(app(model.clone()), body).await;

        assert_eq!(status, StatusCode::OK);
        assert!(model.prompts.lock().unwrap()[0].contains("from klingon to pt-BR"));
    }

    #[tokio::test]
    async fn lists_language_catalog() {
        let response = app(ScriptedModel::replying("ok"))
            .oneshot(Request::get("/api/languages").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json[0], json!({"code": "en", "name": "English"}));
        assert_eq!(json.as_array().unwrap().len(), 10);
    }
}
