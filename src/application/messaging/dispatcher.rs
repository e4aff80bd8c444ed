//! Message dispatcher - Routes commands to handlers

use tracing::Instrument;

use super::parser::MessageParser;
use crate::application::services::CommandService;
use crate::domain::entities::{BotCommand, InvocationContext, User};

/// Message dispatcher - routes parsed commands to their handlers
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
}

impl MessageDispatcher {
    pub fn new(parser: MessageParser, commands: CommandService) -> Self {
        Self { parser, commands }
    }

    pub fn parser_mut(&mut self) -> &mut MessageParser {
        &mut self.parser
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Invoke the handler for `command`
    pub async fn dispatch(&self, command: BotCommand, ctx: &InvocationContext) -> String {
        let span = tracing::info_span!(
            "command",
            id = %ctx.id,
            name = command.name(),
            chat_id = %ctx.chat_id
        );
        async {
            tracing::info!("Handling {} for {}", command, ctx.display_name);
            self.commands.handle(command, ctx).await
        }
        .instrument(span)
        .await
    }

    /// Process raw text from a chat. Returns `None` when the text is not one
    /// of the bot's commands.
    pub async fn process_text(&self, chat_id: &str, sender: &User, text: &str) -> Option<String> {
        let command = self.parser.parse(text)?;
        let ctx = InvocationContext::from_user(chat_id, sender);
        Some(self.dispatch(command, &ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::HealthService;
    use std::sync::Arc;
    use std::time::Duration;

    fn dispatcher() -> MessageDispatcher {
        let mut commands = CommandService::new();
        commands
            .register_defaults(Arc::new(HealthService::new(Duration::from_millis(50))))
            .unwrap();
        MessageDispatcher::new(MessageParser::new("/"), commands)
    }

    #[tokio::test]
    async fn start_contains_display_name() {
        let reply = dispatcher()
            .dispatch(BotCommand::Start, &InvocationContext::new("7", "Мария"))
            .await;
        assert!(reply.contains("Мария"));
        assert!(reply.contains("/start") && reply.contains("/help") && reply.contains("/health"));
    }

    #[tokio::test]
    async fn help_is_independent_of_user() {
        let d = dispatcher();
        let a = d.dispatch(BotCommand::Help, &InvocationContext::new("1", "Alice")).await;
        let b = d.dispatch(BotCommand::Help, &InvocationContext::new("2", "Bob")).await;
        let c = d.dispatch(BotCommand::Help, &InvocationContext::new("1", "Alice")).await;
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[tokio::test]
    async fn process_text_ignores_unknown() {
        let d = dispatcher();
        let user = User::new("5").with_name("Ann", None::<String>);
        assert!(d.process_text("5", &user, "/version").await.is_none());
        assert!(d.process_text("5", &user, "just chatting").await.is_none());

        let reply = d.process_text("5", &user, "/start").await.unwrap();
        assert!(reply.starts_with("Hello, Ann!"));
    }
}
