use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::RelayError;
use crate::languages::{catalog, LanguageEntry};
use crate::state::AppState;
use crate::translate::prompt::{DEFAULT_SOURCE, DEFAULT_TARGET};
use crate::translate::{build_translation_prompt, TranslationResponse};

/// `POST /api/translate`
///
/// Validates `text`, forwards exactly one prompt upstream and returns the
/// generated text verbatim. Upstream failures are logged here and reach the
/// client only as the generic message.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TranslationResponse>, RelayError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("translate", %request_id);

    async move {
        let Json(payload) = payload.map_err(|e| {
            warn!("Rejected translation body: {}", e);
            RelayError::InvalidInput
        })?;

        let text = payload
            .get("text")
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("Rejected translation request without a text string");
                RelayError::InvalidInput
            })?;
        let from = language_field(&payload, "from", DEFAULT_SOURCE);
        let to = language_field(&payload, "to", DEFAULT_TARGET);

        info!("Received text for translation: {} chars, {} -> {}", text.chars().count(), from, to);
        debug!("Text: {}", text);

        let prompt = build_translation_prompt(&from, &to, text);
        match state.model.generate(&prompt).await {
            Ok(translation) => {
                debug!("Translation: {}", translation);
                Ok(Json(TranslationResponse { translation }))
            }
            Err(e) => {
                error!("Error during translation: {}", e);
                Err(RelayError::from(e))
            }
        }
    }
    .instrument(span)
    .await
}

/// Languages pass through unchecked; non-string values are rendered as JSON text
fn language_field(payload: &Value, key: &str, default: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => default.to_string(),
        Some(other) => other.to_string(),
    }
}

/// `GET /api/health`
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "provider": state.config.upstream_config.provider,
        "model": state.model.model_name(),
    }))
}

/// `GET /api/languages`
pub async fn list_languages() -> Json<Vec<LanguageEntry>> {
    Json(catalog())
}
