//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use crate::domain::entities::User;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Chat id used for every console message
pub const CONSOLE_CHAT_ID: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    user: User,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        let login = std::env::var("USER").unwrap_or_else(|_| "developer".to_string());
        Self {
            info: BotInfo {
                username: "console".to_string(),
            },
            user: User::new(CONSOLE_CHAT_ID).with_name(login, None::<String>),
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// The local user every console message is attributed to
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Read the next line, `None` on end of input
    pub async fn read_line(&self) -> Option<String> {
        match self.lines.lock().await.next_line().await {
            Ok(line) => line.map(|l| l.trim().to_string()),
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                None
            }
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        println!("Type /start, /help or /health. Ctrl-D to quit.");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
