use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::translate::{ErrorResponse, TranslationRequest, TranslationResponse};

/// Failure of the call from the client to the relay
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Relay returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected relay response: {0}")]
    Decode(String),
}

/// Anything that can turn a translation request into translated text
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ClientError>;
}

/// HTTP client for the relay's `/api/translate` endpoint
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TranslationService for RelayClient {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ClientError> {
        let url = format!("{}/api/translate", self.base_url);
        debug!("POST {} ({} -> {})", url, request.from, request.to);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            // The relay's error body is generic by construction; fall back to the reason phrase
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: TranslationResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(body.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::LanguageCode;
    use crate::routes::tests::{app, ScriptedModel};

    async fn spawn_relay(model: std::sync::Arc<ScriptedModel>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app(model)).await.unwrap() });
        format!("http://{}/", addr)
    }

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.to_string(),
            from: LanguageCode::En,
            to: LanguageCode::Es,
        }
    }

    #[tokio::test]
    async fn returns_relay_translation() {
        let base = spawn_relay(ScriptedModel::replying("Hola")).await;
        let client = RelayClient::new(&base);
        assert_eq!(client.translate(&request("Hello")).await.unwrap(), "Hola");
    }

    #[tokio::test]
    async fn surfaces_relay_error_message() {
        let base = spawn_relay(ScriptedModel::failing()).await;
        let client = RelayClient::new(&base);
        match client.translate(&request("Hello")).await {
            Err(ClientError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to translate text.");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RelayClient::new(&format!("http://{}", addr));
        assert!(matches!(
            client.translate(&request("Hello")).await,
            Err(ClientError::Network(_))
        ));
    }
}
