use async_trait::async_trait;

/// Failures of the upstream generative API call
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

/// Interface for a stateless text-in/text-out model.
/// Safe for concurrent use; holds no per-request state.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;

    /// Model identifier, reported by the health endpoint
    fn model_name(&self) -> &str;
}
