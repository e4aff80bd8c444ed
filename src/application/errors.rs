//! Application layer errors

use std::time::Duration;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Telegram API error: {0}")]
    Api(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command registration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command already registered: /{0}")]
    AlreadyRegistered(String),
}

/// Dependency probe errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("command failed: {0}")]
    Command(String),

    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_reports_millis() {
        let err = ProbeError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "timed out after 1500ms");
    }

    #[test]
    fn config_error_converts_into_bot_error() {
        let err: BotError = ConfigError::MissingField("TELEGRAM_BOT_TOKEN".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field: TELEGRAM_BOT_TOKEN"
        );
    }
}
