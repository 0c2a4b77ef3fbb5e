// Configuration Storage Service
// Loads config.json and applies environment overrides

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use super::providers::{GEMINI_DEFAULT_MODEL, GEMINI_DEFAULT_URL};

pub const DEFAULT_SECRET_KEY: &str = "dev-key-change-in-production";
const PLACEHOLDER_API_KEY: &str = "tu_api_key_aqui";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    /// Session signing key; the service keeps no sessions but refuses to hide a default.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
            secret_key: default_secret_key(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Characters of the document included in the prompt.
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_prompt_chars: default_max_prompt_chars(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl AiConfig {
    /// Key usable for a request: present, non-blank and not the sample placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_max_upload_mb() -> u64 { 10 }
fn default_secret_key() -> String { DEFAULT_SECRET_KEY.to_string() }
fn default_true() -> bool { true }
fn default_model() -> String { GEMINI_DEFAULT_MODEL.to_string() }
fn default_base_url() -> String { GEMINI_DEFAULT_URL.to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_max_prompt_chars() -> usize { 1500 }
fn default_max_output_tokens() -> u32 { 1024 }

impl AppConfig {
    /// Apply environment overrides through `lookup` (usually `std::env::var`)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get("GOOGLE_API_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.ai.model = model;
        }
        if let Some(url) = get("GEMINI_API_URL") {
            self.ai.base_url = url;
        }
        if let Some(secs) = get("AI_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.ai.timeout_secs = secs;
        }
        if let Some(flag) = get("AI_ENABLED") {
            self.ai.enabled = !matches!(flag.as_str(), "0" | "false" | "FALSE" | "no");
        }
        if let Some(secret) = get("SECRET_KEY") {
            self.server.secret_key = secret;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(mb) = get("MAX_UPLOAD_MB").and_then(|v| v.parse().ok()) {
            self.server.max_upload_mb = mb;
        }
    }

    /// Load from the default config dir, then overlay the process environment
    pub fn load_from_env() -> Result<Self, String> {
        let mut config = match ConfigStore::default_config_dir() {
            Some(dir) => ConfigStore::new(dir).load()?,
            None => AppConfig::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }
}

pub struct ConfigStore {
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_file }
    }

    /// `DETECTOR_IA_CONFIG_DIR`, or the platform config dir
    pub fn default_config_dir() -> Option<PathBuf> {
        match std::env::var("DETECTOR_IA_CONFIG_DIR") {
            Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
            _ => dirs::config_dir().map(|p| p.join("detector-ia")),
        }
    }

    /// Load configuration from file; a missing file yields defaults
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }
}
