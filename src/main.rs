use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use pulse_bot::app;
use pulse_bot::application::errors::{BotError, ConfigError};
use pulse_bot::application::messaging::MessageDispatcher;
use pulse_bot::application::services::health_service;
use pulse_bot::domain::traits::Bot;
use pulse_bot::infrastructure::adapters::console::CONSOLE_CHAT_ID;
use pulse_bot::infrastructure::adapters::telegram::{self, TelegramAdapter};
use pulse_bot::infrastructure::adapters::ConsoleAdapter;
use pulse_bot::infrastructure::config::Config;

/// Pause before polling again after a failed getUpdates call
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "pulse-bot")]
#[command(about = "Telegram bot that reports system health", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and TELEGRAM_BOT_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// Environment file loaded before reading configuration
    #[arg(long, default_value = ".env")]
    env_file: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot
    Run,
    /// Answer commands typed on stdin (dev mode)
    Console,
    /// Run the health check once and print the report
    Health,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Loaded before logging so RUST_LOG from the env file applies
    let env_file = dotenvy::from_filename(&cli.env_file);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = env_file {
        tracing::debug!("Could not load env file ({}): {}", cli.env_file, e);
    }

    let result = match cli.command {
        Commands::Run => load_config(&cli.config, cli.token).and_then(|c| block_on(run_bot(c))),
        Commands::Console => load_config(&cli.config, cli.token).and_then(|c| block_on(run_console(c))),
        Commands::Health => load_config(&cli.config, cli.token).and_then(|c| block_on(run_health(c))),
        Commands::Version => {
            println!("pulse-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn block_on<F>(fut: F) -> Result<ExitCode, BotError>
where
    F: std::future::Future<Output = Result<ExitCode, BotError>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(fut)
}

/// File (when present), then environment, then the `--token` flag
fn load_config(path: &str, token_override: Option<String>) -> Result<Config, BotError> {
    let config = if std::path::Path::new(path).exists() {
        tracing::info!("Loading config from {}", path);
        Config::load(path)?
    } else {
        tracing::debug!("{} not found, using defaults", path);
        Config::default()
    };

    let mut config = config.with_env()?;
    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }
    Ok(config)
}

async fn run_bot(config: Config) -> Result<ExitCode, BotError> {
    let app::App { token, mut dispatcher } = app::bootstrap(&config)?;

    tracing::info!("Starting {}", config.bot.name);

    let mut bot = TelegramAdapter::new(token, config.poll_timeout())?;
    bot.start().await?;
    bot.fetch_bot_info().await?;

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);
    dispatcher.parser_mut().set_bot_username(info.username);

    // Register bot commands with Telegram
    if let Err(e) = bot.register_commands().await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let bot = Arc::new(bot);
    let dispatcher = Arc::new(dispatcher);

    tokio::select! {
        _ = poll_updates(bot, dispatcher) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn poll_updates(bot: Arc<TelegramAdapter>, dispatcher: Arc<MessageDispatcher>) {
    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset).await {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                }

                for update in &updates {
                    let bot = Arc::clone(&bot);
                    let dispatcher = Arc::clone(&dispatcher);
                    let update = update.clone();

                    // Invocations are independent; a slow /health must not hold up other chats
                    tokio::spawn(async move {
                        if let Some((chat_id, reply)) = telegram::handle_update(&dispatcher, &update).await {
                            if let Err(e) = bot.send_message(&chat_id, &reply).await {
                                tracing::error!("Failed to reply to {}: {}", chat_id, e);
                            }
                        }
                    });
                }

                offset = TelegramAdapter::get_next_offset(&updates, offset);
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}

async fn run_console(config: Config) -> Result<ExitCode, BotError> {
    let health = Arc::new(app::build_health(&config)?);
    let dispatcher = app::build_dispatcher(&config, health)?;

    let bot = ConsoleAdapter::new();
    bot.start().await?;

    while let Some(line) = bot.read_line().await {
        if line.is_empty() {
            continue;
        }
        match dispatcher.process_text(CONSOLE_CHAT_ID, bot.user(), &line).await {
            Some(reply) => {
                bot.send_message(CONSOLE_CHAT_ID, &reply).await?;
            }
            None => tracing::debug!("Ignored: {}", line),
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_health(config: Config) -> Result<ExitCode, BotError> {
    let health = app::build_health(&config)?;
    let report = health.check_health().await;

    println!("{}", health_service::render(&report));

    Ok(if report.is_all_healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_config(path: &str) -> Result<ExitCode, BotError> {
    if std::path::Path::new(path).exists() {
        println!("{} already exists, not overwriting", path);
        return Ok(ExitCode::FAILURE);
    }

    let yaml = Config::default().to_yaml()?;
    std::fs::write(path, yaml)
        .map_err(|e| ConfigError::Parse(format!("Failed to write {}: {}", path, e)))?;

    println!("Wrote default config to {}", path);
    Ok(ExitCode::SUCCESS)
}
