use std::sync::Arc;
use anyhow::Result;
use tracing::info;

use crate::config::UpstreamConfig;
use super::gemini::GeminiModel;
use super::interface::GenerativeModel;
use super::openai_compatible::OpenAICompatibleModel;

/// Factory for creating the upstream model client
pub struct ModelFactory;

impl ModelFactory {
    /// Create a model client based on the configuration.
    ///
    /// # Arguments
    /// * `config` - Upstream section of the relay configuration
    /// * `api_key` - Credential resolved from the environment
    pub fn create_model(
        config: &UpstreamConfig,
        api_key: String,
    ) -> Result<Arc<dyn GenerativeModel>> {
        info!("Initializing upstream model: {}", config.provider);

        match config.provider.as_str() {
            "gemini" | "gemini_llm" => Ok(Arc::new(GeminiModel::new(
                config.base_url.clone(),
                config.model.clone(),
                api_key,
            ))),
            "openai_compatible_llm" | "openai_llm" | "deepseek_llm" | "groq_llm"
            | "mistral_llm" => Ok(Arc::new(OpenAICompatibleModel::new(
                config.base_url.clone(),
                config.model.clone(),
                api_key,
                config.temperature,
            ))),
            _ => Err(anyhow::anyhow!("Unsupported upstream provider: {}", config.provider)),
        }
    }
}
