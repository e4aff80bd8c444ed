use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use super::InvocationContext;
use crate::application::errors::CommandError;

/// The fixed set of commands the bot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotCommand {
    Start,
    Help,
    Health,
}

impl BotCommand {
    /// All commands in the order they are listed to users
    pub const ALL: [BotCommand; 3] = [BotCommand::Start, BotCommand::Help, BotCommand::Health];

    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::Help => "help",
            BotCommand::Health => "health",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BotCommand::Start => "Start working with the bot",
            BotCommand::Help => "Show this help",
            BotCommand::Health => "Check system health",
        }
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

impl FromStr for BotCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BotCommand::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown command: {}", s))
    }
}

/// Produces the reply for one command invocation
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &InvocationContext) -> String;
}

/// Represents a bot command bound to its handler
#[derive(Clone)]
pub struct Command {
    pub kind: BotCommand,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new<H: CommandHandler + 'static>(kind: BotCommand, handler: H) -> Self {
        Self {
            kind,
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("kind", &self.kind).finish()
    }
}

/// Command registry for managing available commands
#[derive(Default, Debug)]
pub struct CommandRegistry {
    commands: HashMap<BotCommand, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Each command may be registered only once.
    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        if self.commands.contains_key(&command.kind) {
            return Err(CommandError::AlreadyRegistered(command.name().to_string()));
        }
        self.commands.insert(command.kind, command);
        Ok(())
    }

    pub fn get(&self, kind: BotCommand) -> Option<&Command> {
        self.commands.get(&kind)
    }

    /// Registered commands in listing order
    pub fn all(&self) -> impl Iterator<Item = &Command> {
        BotCommand::ALL.iter().filter_map(|k| self.commands.get(k))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl CommandHandler for Fixed {
        async fn handle(&self, _ctx: &InvocationContext) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn parses_only_exact_names() {
        assert_eq!("start".parse::<BotCommand>(), Ok(BotCommand::Start));
        assert_eq!("health".parse::<BotCommand>(), Ok(BotCommand::Health));
        assert!("Start".parse::<BotCommand>().is_err());
        assert!("version".parse::<BotCommand>().is_err());
        assert!("".parse::<BotCommand>().is_err());
    }

    #[test]
    fn rejects_duplicate_registration() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new(BotCommand::Help, Fixed("a"))).unwrap();

        let err = registry
            .register(Command::new(BotCommand::Help, Fixed("b")))
            .unwrap_err();
        assert_eq!(err, CommandError::AlreadyRegistered("help".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lists_in_declared_order() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new(BotCommand::Health, Fixed("h"))).unwrap();
        registry.register(Command::new(BotCommand::Start, Fixed("s"))).unwrap();

        let names: Vec<_> = registry.all().map(|c| c.name()).collect();
        assert_eq!(names, vec!["start", "health"]);
    }
}
