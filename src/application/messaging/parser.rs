//! Message parser - Extracts a known command from raw message text

use crate::domain::entities::BotCommand;

/// Parses incoming text into one of the bot's commands
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    /// Username used to accept `/cmd@username` addressed commands in groups
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    pub fn set_bot_username(&mut self, username: impl Into<String>) {
        self.bot_username = Some(username.into());
    }

    /// Parse a text message. Returns `None` for plain text, unknown commands
    /// and commands addressed to another bot.
    pub fn parse(&self, text: &str) -> Option<BotCommand> {
        let text = text.trim_start();
        let cmd_text = text
            .strip_prefix('/')
            .or_else(|| text.strip_prefix(self.command_prefix.as_str()).filter(|_| !self.command_prefix.is_empty()))?;

        let token = cmd_text.split_whitespace().next()?;
        let name = match token.split_once('@') {
            Some((name, target)) => {
                if !self.is_addressed_to_me(target) {
                    tracing::debug!("Ignoring command addressed to @{}", target);
                    return None;
                }
                name
            }
            None => token,
        };

        match name.parse() {
            Ok(cmd) => Some(cmd),
            Err(e) => {
                tracing::debug!("Ignoring message: {}", e);
                None
            }
        }
    }

    fn is_addressed_to_me(&self, target: &str) -> bool {
        match &self.bot_username {
            Some(me) => me.eq_ignore_ascii_case(target),
            None => true,
        }
    }
}
