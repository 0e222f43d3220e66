//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub store: StoreConfig,
    pub completion: CompletionConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreConfig {
    pub path: PathBuf,
}

/// Completion service endpoint. The request goes to
/// `{base-url}/deployments/{model}/chat/completions/?api-version={api-version}`
/// with the access token in an `api-key` header.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub api_version: String,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "tally-bot".to_string(),
                prefix: "/".to_string(),
            },
            store: StoreConfig {
                path: PathBuf::from("tally-bot.db"),
            },
            completion: CompletionConfig {
                base_url: "https://your-resource.openai.azure.com/openai".to_string(),
                model: "gpt-4o-mini".to_string(),
                api_version: "2024-05-01-preview".to_string(),
                access_token: None,
                timeout_seconds: 30,
            },
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                }),
                console: Some(ConsoleConfig { enabled: true }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Defaults plus environment-variable overrides; used when no config file
    /// is present.
    pub fn load_env() -> Self {
        let mut config = Config::default();

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            if let Some(ref mut tg) = config.adapters.telegram {
                tg.token = Some(token);
                tg.enabled = true;
            }
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(path) = std::env::var("STORE_PATH") {
            config.store.path = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("COMPLETION_BASE_URL") {
            config.completion.base_url = url;
        }

        if let Ok(model) = std::env::var("COMPLETION_MODEL") {
            config.completion.model = model;
        }

        if let Ok(version) = std::env::var("COMPLETION_API_VERSION") {
            config.completion.api_version = version;
        }

        if let Ok(token) = std::env::var("COMPLETION_ACCESS_TOKEN") {
            config.completion.access_token = Some(token);
        }

        config
    }
}
