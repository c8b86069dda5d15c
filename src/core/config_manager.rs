// src/core/config_manager.rs
//! Configuration: built-in defaults, then `config.yaml`, then environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub scraper: ScraperSettings,
    pub llm: LlmSettings,
    pub converter: ConverterSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    pub max_upload_bytes: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 4002,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub site_url: String,
    pub app_title: String,
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "deepseek/deepseek-chat-v3-0324:free".to_string(),
            api_key: None,
            site_url: "http://localhost:3000".to_string(),
            app_title: "Job Tracker SaaS".to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5555".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<AppConfig>,
    #[serde(default)]
    production: Option<AppConfig>,
}

pub struct ConfigManager;

impl ConfigManager {
    /// Loads `config.yaml` from the working directory when present and
    /// applies environment overrides.
    pub fn load() -> Result<AppConfig> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut config = Self::load_file(Path::new(CONFIG_FILE), &environment)?;
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());

        if config.llm.api_key.is_none() {
            warn!("No language model API key configured; résumé analysis will be rejected");
        }
        Ok(config)
    }

    fn load_file(path: &Path, environment: &str) -> Result<AppConfig> {
        if !path.exists() {
            info!("{} not found, using built-in defaults", path.display());
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content, environment)
    }

    fn parse(content: &str, environment: &str) -> Result<AppConfig> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let selected = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(selected.unwrap_or_default())
    }

    fn apply_overrides(config: &mut AppConfig, var: impl Fn(&str) -> Option<String>) {
        if let Some(port) = var("ROCKET_PORT") {
            match port.parse() {
                Ok(port) => config.server.port = port,
                Err(_) => warn!("Ignoring invalid ROCKET_PORT: {}", port),
            }
        }
        if let Some(key) = var("OPENROUTER_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.llm.api_key = Some(key);
        }
        if let Some(url) = var("OPENROUTER_API_URL") {
            config.llm.api_url = url;
        }
        if let Some(model) = var("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Some(site) = var("SITE_URL") {
            config.llm.site_url = site;
        }
        if let Some(url) = var("CONVERTER_SERVICE_URL") {
            config.converter.base_url = url;
        }
    }
}
