use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use regex::Regex;

use crate::client::debouncer::SETTLE_DELAY;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub upstream_config: UpstreamConfig,
    #[serde(default)]
    pub client_config: ClientConfig,
}

/// Relay server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Upstream generative API settings.
/// The credential itself never lives here, only the name of the variable holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

/// Terminal client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_from_lang")]
    pub from_lang: String,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
    #[serde(default = "default_theme_path")]
    pub theme_path: String,
}

fn default_relay_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_settle_delay_ms() -> u64 {
    SETTLE_DELAY.as_millis() as u64
}

fn default_from_lang() -> String {
    "en".to_string()
}

fn default_to_lang() -> String {
    "fr".to_string()
}

fn default_theme_path() -> String {
    "theme.json".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let content = substitute_env_vars(&content);

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        let config = if path_lower.ends_with(".json") || path_lower.ends_with(".jsonld") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Load the first config found, or the built-in defaults if there is none.
    ///
    /// Lookup order: the explicit path, `CONFIG_PATH`, then `conf.yaml` and
    /// `conf.json` in the working directory. An explicit path must exist.
    pub fn discover(explicit: Option<&str>) -> Result<(Self, Option<String>)> {
        if let Some(path) = explicit {
            let mut config = Self::load(path)?;
            config.apply_env_overrides();
            return Ok((config, Some(path.to_string())));
        }

        let candidates: Vec<String> = vec![
            std::env::var("CONFIG_PATH").ok(),
            Some("conf.yaml".to_string()),
            Some("conf.json".to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        for path in candidates {
            if !Path::new(&path).exists() {
                continue;
            }
            let mut config = Self::load(&path)?;
            config.apply_env_overrides();
            return Ok((config, Some(path)));
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok((config, None))
    }

    /// `PORT` and `RELAY_URL` take precedence over the file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.system_config.port = port;
        }
        if let Some(url) = lookup("RELAY_URL").filter(|u| !u.trim().is_empty()) {
            self.client_config.relay_url = url;
        }
    }
}

impl UpstreamConfig {
    /// Read the API key from the environment, failing if it is absent or blank
    pub fn resolve_api_key(&self) -> Result<String> {
        let key = std::env::var(&self.api_key_env).with_context(|| {
            format!("{} environment variable is required", self.api_key_env)
        })?;
        if key.trim().is_empty() {
            anyhow::bail!("{} environment variable is empty", self.api_key_env);
        }
        Ok(key)
    }
}

/// Replace `${VAR_NAME}` with the variable's value; unknown variables are left as-is
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("valid env pattern");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            settle_delay_ms: default_settle_delay_ms(),
            from_lang: default_from_lang(),
            to_lang: default_to_lang(),
            theme_path: default_theme_path(),
        }
    }
}
