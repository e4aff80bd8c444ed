//! Process wiring shared by every transport

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::{MessageDispatcher, MessageParser};
use crate::application::services::{CommandService, HealthService};
use crate::infrastructure::cache::RedisProbe;
use crate::infrastructure::config::Config;

/// A configured bot, ready to be attached to the Telegram transport
pub struct App {
    pub token: String,
    pub dispatcher: MessageDispatcher,
}

/// Health service probing the configured Redis instance
pub fn build_health(config: &Config) -> Result<HealthService, BotError> {
    let redis = RedisProbe::open(&config.cache.url)?;
    tracing::info!("Health probes: Redis at {} (timeout {:?})", redis.url(), config.probe_timeout());
    Ok(HealthService::new(config.probe_timeout()).with_probe(Arc::new(redis)))
}

/// Dispatcher with `/start`, `/help` and `/health` registered
pub fn build_dispatcher(config: &Config, health: Arc<HealthService>) -> Result<MessageDispatcher, BotError> {
    let mut commands = CommandService::new();
    commands.register_defaults(health)?;
    tracing::info!("Registered {} commands", commands.registry().len());

    Ok(MessageDispatcher::new(MessageParser::new(&config.bot.prefix), commands))
}

/// Validate the credential, then build the health probes and register the
/// commands. Nothing is built when the token is missing.
pub fn bootstrap(config: &Config) -> Result<App, BotError> {
    let token = config.require_token()?.to_string();
    let health = Arc::new(build_health(config)?);
    let dispatcher = build_dispatcher(config, health)?;
    Ok(App { token, dispatcher })
}
