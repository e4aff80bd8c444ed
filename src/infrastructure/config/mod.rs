//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;

pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

/// Longest long-poll timeout accepted, in seconds
pub const MAX_POLL_TIMEOUT_SECS: u64 = 300;

/// Longest probe timeout accepted, in milliseconds
pub const MAX_PROBE_TIMEOUT_MS: u64 = 60_000;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CacheConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "pulse-bot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            poll_timeout_secs: 30,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            timeout_ms: 3000,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Apply environment overrides
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV) {
            self.telegram.token = Some(token);
        }

        if let Some(url) = lookup("REDIS_URL") {
            self.cache.url = url;
        }

        if let Some(prefix) = lookup("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Some(ms) = lookup("HEALTH_TIMEOUT_MS") {
            self.cache.timeout_ms = parse_number("HEALTH_TIMEOUT_MS", &ms)?;
        }

        if let Some(secs) = lookup("POLL_TIMEOUT_SECS") {
            self.telegram.poll_timeout_secs = parse_number("POLL_TIMEOUT_SECS", &secs)?;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("cache timeout must be greater than zero".to_string()));
        }
        if self.cache.timeout_ms > MAX_PROBE_TIMEOUT_MS {
            return Err(ConfigError::InvalidValue(format!(
                "cache timeout must be at most {}ms, got {}ms",
                MAX_PROBE_TIMEOUT_MS, self.cache.timeout_ms
            )));
        }
        if self.telegram.poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue(format!(
                "poll timeout must be at most {}s, got {}s",
                MAX_POLL_TIMEOUT_SECS, self.telegram.poll_timeout_secs
            )));
        }
        Ok(())
    }

    /// Bot token, if one is configured and not blank
    pub fn token(&self) -> Option<&str> {
        self.telegram
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token()
            .ok_or_else(|| ConfigError::MissingField(TOKEN_ENV.to_string()))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.cache.timeout_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.telegram.poll_timeout_secs)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{} must be a number, got {:?}", key, value)))
}
