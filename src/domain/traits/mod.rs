//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod probe;

pub use bot::{Bot, BotInfo};
pub use probe::CacheProbe;
