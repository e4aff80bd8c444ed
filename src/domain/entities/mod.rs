//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod context;
pub mod command;
pub mod health;

pub use user::User;
pub use context::InvocationContext;
pub use command::{BotCommand, Command, CommandHandler, CommandRegistry};
pub use health::{HealthReport, HealthStatus, ProbeResult};
