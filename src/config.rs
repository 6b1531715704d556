use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::generation::models::{self, Provider};

pub const CONFIG_FILE: &str = ".pr-describer.toml";
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-describer.toml.
///
/// All fields are optional; the tool works with zero config as long as an
/// API key for the active provider is available in the environment.
/// The pipeline only ever reads this.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub template: TemplateConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    /// Requests are sent unauthenticated when neither is set.
    pub token: Option<String>,
    /// Override for GitHub Enterprise (e.g. "https://ghe.example.com/api/v3")
    pub api_base: Option<String>,
}

impl GitHubConfig {
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_GITHUB_API)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiConfig {
    /// Active provider; OpenAI unless set
    #[serde(default)]
    pub provider: Provider,

    #[serde(default)]
    pub openai: ProviderSettings,

    #[serde(default)]
    pub anthropic: ProviderSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Delay before the first retry; doubled for each following retry
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// How long the success label stays before reverting
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
    /// How long an error message stays visible
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            success_display_ms: default_success_display_ms(),
            error_display_ms: default_error_display_ms(),
        }
    }
}

fn default_success_display_ms() -> u64 {
    2000
}

fn default_error_display_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateConfig {
    /// File used instead of the bundled fallback template
    pub fallback_path: Option<PathBuf>,
}

/// The single provider selection the generation client runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: Provider,
    /// May be empty; the generation client rejects that before any request
    pub credential: String,
    pub model_id: String,
}

impl Config {
    /// Load configuration from .pr-describer.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Fill credentials missing from the file with their environment variables.
    pub fn apply_env(&mut self) {
        fill_from_env(&mut self.github.token, "GITHUB_TOKEN");
        fill_from_env(&mut self.ai.openai.api_key, "OPENAI_API_KEY");
        fill_from_env(&mut self.ai.anthropic.api_key, "ANTHROPIC_API_KEY");
    }

    /// Resolve the active provider selection. The model falls back to the
    /// provider's default catalog entry.
    pub fn active_provider(&self) -> ProviderConfig {
        let provider = self.ai.provider;
        let settings = match provider {
            Provider::OpenAi => &self.ai.openai,
            Provider::Anthropic => &self.ai.anthropic,
        };
        ProviderConfig {
            provider,
            credential: settings.api_key.clone().unwrap_or_default(),
            model_id: settings
                .model
                .clone()
                .unwrap_or_else(|| models::default_model(provider).to_string()),
        }
    }

    /// Apply per-run CLI choices. Only the in-memory value changes.
    pub fn override_provider(&mut self, provider: Option<Provider>, model: Option<String>) {
        if let Some(provider) = provider {
            self.ai.provider = provider;
        }
        if let Some(model) = model {
            match self.ai.provider {
                Provider::OpenAi => self.ai.openai.model = Some(model),
                Provider::Anthropic => self.ai.anthropic.model = Some(model),
            }
        }
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.generation.retry_base_delay_ms)
    }
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if slot.is_none() {
        if let Ok(value) = std::env::var(var) {
            *slot = Some(value);
        }
    }
}
