use std::sync::Arc;

use crate::config::Config;
use crate::upstream::{GenerativeModel, ModelFactory};

/// Shared relay state. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub model: Arc<dyn GenerativeModel>,
}

impl AppState {
    /// Resolve the API key and build the upstream client; fails if the key is missing
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api_key = config.upstream_config.resolve_api_key()?;
        let model = ModelFactory::create_model(&config.upstream_config, api_key)?;
        Ok(Self::with_model(config, model))
    }

    pub fn with_model(config: Config, model: Arc<dyn GenerativeModel>) -> Self {
        Self { config, model }
    }
}
