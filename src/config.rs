use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub beatpath: BeatpathConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

/// Beatpath-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BeatpathConfig {
    /// Path to the precomputed victory graph (GEXF).
    pub graph_path: PathBuf,
    /// Path to the team roster (JSON array of records with id/name/mascot/logo).
    pub roster_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// LLM fallback configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            api_key_env: default_llm_api_key_env(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_llm_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_llm_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_http_port() -> u16 {
    8080
}

fn default_allowed_origins() -> Vec<String> {
    // Default empty — set allowed_origins in config.toml for production
    vec![]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in BEATPATH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        // This allows the LLM API key to be set from .env file
        let _ = dotenv::dotenv();

        let config_path = std::env::var("BEATPATH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    ///
    /// The graph artifact is required: the process cannot start without it.
    /// The roster file and the LLM credential are optional and degrade at
    /// load time instead of failing here.
    fn validate(&self) -> Result<()> {
        if !self.beatpath.graph_path.exists() {
            anyhow::bail!(
                "Graph file not found at {}. Set graph_path in config.toml to the precomputed victory graph.",
                self.beatpath.graph_path.display()
            );
        }

        if !self.beatpath.roster_path.exists() {
            log::warn!(
                "Roster file not found at {} - teams will have no logos or mascots",
                self.beatpath.roster_path.display()
            );
        }

        if self.llm_api_key().is_none() {
            log::info!(
                "Environment variable {} not set - LLM fallback disabled",
                self.llm.api_key_env
            );
        }

        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be greater than 0");
        }

        Ok(())
    }

    /// Get graph artifact path
    pub fn graph_path(&self) -> &Path {
        &self.beatpath.graph_path
    }

    /// Get roster artifact path
    pub fn roster_path(&self) -> &Path {
        &self.beatpath.roster_path
    }

    /// LLM API key from the configured environment variable, if present.
    /// Absence is a supported deployment state, not an error.
    pub fn llm_api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
    }
}
