use std::sync::Arc;

use async_trait::async_trait;

use super::health_service::{self, HealthService};
use crate::application::errors::CommandError;
use crate::domain::entities::{BotCommand, Command, CommandHandler, CommandRegistry, InvocationContext};

/// Greeting for `/start`
pub fn start_text(display_name: &str) -> String {
    let mut text = format!(
        "Hello, {}!\n\nTest System Telegram Bot\nVersion: {}\n\nCommands:\n",
        display_name,
        env!("CARGO_PKG_VERSION")
    );
    text.push_str(&command_list());
    text
}

/// Reply for `/help`. Identical for every caller.
pub fn help_text() -> String {
    format!("Available commands:\n{}", command_list())
}

fn command_list() -> String {
    BotCommand::ALL
        .iter()
        .map(|c| format!("{} - {}", c, c.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct StartCommand;

#[async_trait]
impl CommandHandler for StartCommand {
    async fn handle(&self, ctx: &InvocationContext) -> String {
        start_text(&ctx.display_name)
    }
}

pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, _ctx: &InvocationContext) -> String {
        help_text()
    }
}

pub struct HealthCommand {
    health: Arc<HealthService>,
}

impl HealthCommand {
    pub fn new(health: Arc<HealthService>) -> Self {
        Self { health }
    }
}

#[async_trait]
impl CommandHandler for HealthCommand {
    async fn handle(&self, _ctx: &InvocationContext) -> String {
        let report = self.health.check_health().await;
        tracing::info!(healthy = report.is_all_healthy(), "Health check finished");
        health_service::render(&report)
    }
}

/// Service for managing and executing commands
#[derive(Debug, Default)]
pub struct CommandService {
    registry: CommandRegistry,
}

impl CommandService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        self.registry.register(command)
    }

    /// Register `/start`, `/help` and `/health`
    pub fn register_defaults(&mut self, health: Arc<HealthService>) -> Result<(), CommandError> {
        self.register(Command::new(BotCommand::Start, StartCommand))?;
        self.register(Command::new(BotCommand::Help, HelpCommand))?;
        self.register(Command::new(BotCommand::Health, HealthCommand::new(health)))?;
        Ok(())
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn handle(&self, kind: BotCommand, ctx: &InvocationContext) -> String {
        match self.registry.get(kind) {
            Some(cmd) => cmd.handler.handle(ctx).await,
            None => {
                tracing::warn!("No handler registered for {}", kind);
                help_text()
            }
        }
    }
}
