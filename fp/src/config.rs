//! fitplan configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file name
const LOCAL_CONFIG: &str = ".fitplan.yml";

/// Main fitplan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Completion service configuration
    pub llm: LlmConfig,

    /// Prompt template configuration
    pub prompts: PromptsConfig,

    /// Plan export configuration
    pub export: ExportConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks generation parameters so a bad config fails at startup rather than on the first request.
    pub fn validate(&self) -> Result<()> {
        let llm = &self.llm;
        if llm.model.trim().is_empty() {
            return Err(eyre::eyre!("llm.model must not be empty"));
        }
        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(eyre::eyre!("llm.temperature {} is outside [0, 2]", llm.temperature));
        }
        if !(llm.top_p > 0.0 && llm.top_p <= 1.0) {
            return Err(eyre::eyre!("llm.top-p {} is outside (0, 1]", llm.top_p));
        }
        if llm.plan_max_tokens == 0 || llm.chat_max_tokens == 0 {
            return Err(eyre::eyre!("llm.plan-max-tokens and llm.chat-max-tokens must be positive"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .fitplan.yml
        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/fitplan/fitplan.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Any failure yields `None`; the full load reports errors later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
                paths.extend(Self::user_config_path());
                paths
            }
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fitplan").join("fitplan.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL (OpenAI-compatible)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Nucleus-sampling threshold
    #[serde(rename = "top-p")]
    pub top_p: f64,

    /// Max tokens for plan generation
    #[serde(rename = "plan-max-tokens")]
    pub plan_max_tokens: u32,

    /// Max tokens for follow-up answers
    #[serde(rename = "chat-max-tokens")]
    pub chat_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: "https://api.groq.com/openai".to_string(),
            temperature: 1.0,
            top_p: 1.0,
            plan_max_tokens: 3072,
            chat_max_tokens: 1024,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the process environment
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the API key through `lookup`, which maps a variable name to its value
    pub fn api_key_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.api_key_env
            )),
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory with `plan.pmt` / `chat.pmt` overrides
    pub dir: Option<PathBuf>,
}

/// Plan export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default file name for exported plans
    #[serde(rename = "file-name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: crate::export::DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}
