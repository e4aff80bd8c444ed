//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::application::errors::{BotError, ConfigError};
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::{self, BotCommand};
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Slack added on top of the long-poll timeout for the HTTP request
const REQUEST_SLACK: Duration = Duration::from_secs(10);

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

impl From<&User> for entities::User {
    fn from(user: &User) -> Self {
        let mut out = entities::User::new(user.id.to_string());
        out.username = user.username.clone();
        out.first_name = user.first_name.clone();
        out.last_name = user.last_name.clone();
        out
    }
}

#[derive(Serialize)]
struct Empty {}

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, BotError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(BotError::Api(
                self.description.unwrap_or_else(|| "request was not successful".to_string()),
            )),
        }
    }
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
    poll_timeout: Duration,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, poll_timeout: Duration) -> Result<Self, BotError> {
        let request_timeout = poll_timeout.checked_add(REQUEST_SLACK).ok_or_else(|| {
            ConfigError::InvalidValue(format!("poll timeout too large: {:?}", poll_timeout))
        })?;

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        Ok(Self {
            token: token.into(),
            client,
            info: BotInfo {
                username: "pulse_bot".to_string(),
            },
            poll_timeout,
        })
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res, BotError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            // Strip the URL so the token never ends up in logs
            .map_err(|e| BotError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let data: ApiResponse<Res> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} ({}): {}", method, status, e.without_url())))?;

        data.into_result()
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            username: String,
        }

        let data: BotInfoResponse = self.call("getMe", &Empty {}).await?;

        self.info = BotInfo {
            username: data.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: vec!["message".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Send a plain text message via Telegram API
    pub async fn send_message_api(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let result: MessageResult = self
            .call("sendMessage", &SendMessageRequest { chat_id, text })
            .await?;

        Ok(result.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        let request = set_my_commands_request();
        let _: bool = self.call("setMyCommands", &request).await?;

        tracing::info!("Registered {} bot commands with Telegram", request.commands.len());
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CommandEntry {
    command: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct SetMyCommandsRequest {
    commands: Vec<CommandEntry>,
}

fn set_my_commands_request() -> SetMyCommandsRequest {
    SetMyCommandsRequest {
        commands: BotCommand::ALL
            .iter()
            .map(|c| CommandEntry {
                command: c.name(),
                description: c.description(),
            })
            .collect(),
    }
}

/// Turn one update into `(chat_id, reply)`, or `None` when there is nothing to answer
pub async fn handle_update(dispatcher: &MessageDispatcher, update: &Update) -> Option<(String, String)> {
    let msg = update.message.as_ref()?;
    let text = msg.text.as_deref()?;
    let chat_id = msg.chat.id.to_string();

    let sender = match &msg.from {
        Some(user) => entities::User::from(user),
        None => entities::User::new(chat_id.clone()),
    };

    let reply = dispatcher.process_text(&chat_id, &sender, text).await?;
    Some((chat_id, reply))
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        let prefix: String = self.token.chars().take(8).collect();
        tracing::info!("Starting Telegram bot (token: {}...)", prefix);
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);

        match self.send_message_api(chat_id, text).await {
            Ok(msg_id) => Ok(msg_id),
            Err(e) => {
                tracing::error!("Failed to send message: {}", e);
                Err(e)
            }
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
